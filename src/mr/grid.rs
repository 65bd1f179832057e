use std::{collections::HashSet, path::Path};

use serde::Deserialize;

use crate::error::ConfigError;

/// A named rectangle of the coordinate plane
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cell {
    pub id: String,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Cell {
    pub fn new(id: impl Into<String>, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            id: id.into(),
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Lower bounds are exclusive and upper bounds inclusive, so a point on an edge
    /// shared by two neighbours belongs to the one whose upper bound it touches
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.xmin < x && x <= self.xmax && self.ymin < y && y <= self.ymax
    }

    fn is_valid(&self) -> bool {
        [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite())
            && self.xmin < self.xmax
            && self.ymin < self.ymax
    }
}

#[derive(Deserialize)]
struct GridFile {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Cell,
}

/// The cells in declaration order. Cells are assumed not to overlap.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cells: Vec<Cell>) -> Result<Self, ConfigError> {
        if cells.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        let mut seen = HashSet::new();
        for cell in &cells {
            if !cell.is_valid() {
                return Err(ConfigError::InvalidCell {
                    id: cell.id.clone(),
                    xmin: cell.xmin,
                    xmax: cell.xmax,
                    ymin: cell.ymin,
                    ymax: cell.ymax,
                });
            }
            if !seen.insert(cell.id.as_str()) {
                return Err(ConfigError::DuplicateCell(cell.id.clone()));
            }
        }
        Ok(Self { cells })
    }

    /// Read a GeoJSON-like grid file, taking each feature's `properties` as a cell
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let file = serde_json::from_str::<GridFile>(contents)?;
        Self::new(file.features.into_iter().map(|f| f.properties).collect())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The first cell, in declaration order, containing the point
    pub fn classify(&self, x: f64, y: f64) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.contains(x, y))
    }
}
