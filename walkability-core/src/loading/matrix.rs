//! Populating the cost matrix through a [`DistanceMatrixProvider`].
//!
//! Requested cells are tiled into blocks within the provider's limits and the
//! blocks are fetched in parallel. A block the provider rejects as too large
//! is split in half and retried; any other failure marks the block's cells
//! unreachable without further requests. Building a matrix never fails.

use geo::Point;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::model::{CostMatrix, MatrixCell};
use crate::providers::{DistanceMatrixProvider, MatrixBlock, ProviderError};
use crate::{HOME_INDEX, PointIndex};

/// Per-request size limits of the matrix provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Maximum origins × destinations per request
    pub max_elements: usize,
    pub max_origins: usize,
    pub max_destinations: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_elements: 100,
            max_origins: 25,
            max_destinations: 25,
        }
    }
}

/// A rectangular group of cells fetched with one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub origins: Vec<PointIndex>,
    pub destinations: Vec<PointIndex>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.origins.len() * self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Halves the block along its larger side; `None` for a single cell
    fn split(&self) -> Option<(Block, Block)> {
        if self.origins.len() >= self.destinations.len() && self.origins.len() > 1 {
            let (a, b) = self.origins.split_at(self.origins.len() / 2);
            Some((
                Block {
                    origins: a.to_vec(),
                    destinations: self.destinations.clone(),
                },
                Block {
                    origins: b.to_vec(),
                    destinations: self.destinations.clone(),
                },
            ))
        } else if self.destinations.len() > 1 {
            let (a, b) = self.destinations.split_at(self.destinations.len() / 2);
            Some((
                Block {
                    origins: self.origins.clone(),
                    destinations: a.to_vec(),
                },
                Block {
                    origins: self.origins.clone(),
                    destinations: b.to_vec(),
                },
            ))
        } else {
            None
        }
    }
}

/// Tiles `origins × destinations` into blocks that respect `limits`.
/// Every cell lands in exactly one block.
pub fn plan_blocks(
    origins: &[PointIndex],
    destinations: &[PointIndex],
    limits: BatchLimits,
) -> Vec<Block> {
    if origins.is_empty() || destinations.is_empty() {
        return Vec::new();
    }

    let max_elements = limits.max_elements.max(1);
    let cols = limits
        .max_destinations
        .max(1)
        .min(max_elements)
        .min(destinations.len());
    let rows = limits.max_origins.max(1).min(max_elements / cols);

    origins
        .chunks(rows)
        .flat_map(|origin_chunk| {
            destinations.chunks(cols).map(move |destination_chunk| Block {
                origins: origin_chunk.to_vec(),
                destinations: destination_chunk.to_vec(),
            })
        })
        .collect()
}

/// Builds the full N×N matrix for `coordinates`.
pub fn build_cost_matrix(
    provider: &dyn DistanceMatrixProvider,
    coordinates: &[Point<f64>],
    limits: BatchLimits,
) -> CostMatrix {
    let size = coordinates.len();
    let all: Vec<PointIndex> = (0..size).collect();
    let blocks = plan_blocks(&all, &all, limits);

    info!(
        "Requesting {size}x{size} walking matrix in {} blocks",
        blocks.len()
    );

    let mut matrix = CostMatrix::unreachable(size);
    fill_blocks(provider, coordinates, &blocks, &mut matrix);

    let unreachable = matrix.unreachable_count();
    if unreachable > 0 {
        warn!("{unreachable} of {} matrix cells are unreachable", size * size);
    }
    matrix
}

/// Refetches row 0 and column 0 (the cells involving home) after home moved.
///
/// `coordinates` must already hold the new home position; all other cells of
/// `matrix` are left untouched.
pub fn refresh_home_cells(
    provider: &dyn DistanceMatrixProvider,
    coordinates: &[Point<f64>],
    matrix: &mut CostMatrix,
    limits: BatchLimits,
) {
    let size = coordinates.len();
    let all: Vec<PointIndex> = (0..size).collect();
    let others: Vec<PointIndex> = (1..size).collect();

    let mut blocks = plan_blocks(&[HOME_INDEX], &all, limits);
    blocks.extend(plan_blocks(&others, &[HOME_INDEX], limits));

    for &idx in &all {
        matrix.set(HOME_INDEX, idx, MatrixCell::UNREACHABLE);
        matrix.set(idx, HOME_INDEX, MatrixCell::UNREACHABLE);
    }

    debug!(
        "Refreshing {} home cells in {} blocks",
        2 * size - 1,
        blocks.len()
    );
    fill_blocks(provider, coordinates, &blocks, matrix);
}

fn fill_blocks(
    provider: &dyn DistanceMatrixProvider,
    coordinates: &[Point<f64>],
    blocks: &[Block],
    matrix: &mut CostMatrix,
) {
    // Blocks are disjoint, so results can be written back in any order
    let cells: Vec<(PointIndex, PointIndex, MatrixCell)> = blocks
        .par_iter()
        .flat_map_iter(|block| fetch_block(provider, coordinates, block))
        .collect();

    for (from, to, cell) in cells {
        matrix.set(from, to, cell);
    }
}

fn fetch_block(
    provider: &dyn DistanceMatrixProvider,
    coordinates: &[Point<f64>],
    block: &Block,
) -> Vec<(PointIndex, PointIndex, MatrixCell)> {
    let origins: Vec<Point<f64>> = block.origins.iter().map(|&i| coordinates[i]).collect();
    let destinations: Vec<Point<f64>> =
        block.destinations.iter().map(|&j| coordinates[j]).collect();

    let result = provider
        .fetch(&origins, &destinations)
        .and_then(|rows| check_shape(rows, block));

    match result {
        Ok(rows) => block
            .origins
            .iter()
            .zip(rows)
            .flat_map(|(&from, row)| {
                block
                    .destinations
                    .iter()
                    .zip(row)
                    .map(move |(&to, cell)| (from, to, cell.unwrap_or(MatrixCell::UNREACHABLE)))
            })
            .collect(),
        Err(e @ ProviderError::TooLarge { .. }) => match block.split() {
            Some((left, right)) => {
                debug!(
                    "{}x{} block over the provider limit ({e}), retrying in halves",
                    block.origins.len(),
                    block.destinations.len()
                );
                let (mut cells, rest) = rayon::join(
                    || fetch_block(provider, coordinates, &left),
                    || fetch_block(provider, coordinates, &right),
                );
                cells.extend(rest);
                cells
            }
            None => unreachable_block(block, &e),
        },
        Err(e) => unreachable_block(block, &e),
    }
}

fn unreachable_block(
    block: &Block,
    error: &ProviderError,
) -> Vec<(PointIndex, PointIndex, MatrixCell)> {
    warn!(
        "{}x{} walking costs unavailable: {error}",
        block.origins.len(),
        block.destinations.len()
    );
    block
        .origins
        .iter()
        .flat_map(|&from| {
            block
                .destinations
                .iter()
                .map(move |&to| (from, to, MatrixCell::UNREACHABLE))
        })
        .collect()
}

fn check_shape(rows: MatrixBlock, block: &Block) -> Result<MatrixBlock, ProviderError> {
    let expected_cols = block.destinations.len();
    if rows.len() != block.origins.len() || rows.iter().any(|row| row.len() != expected_cols) {
        return Err(ProviderError::Malformed(format!(
            "expected {}x{} block",
            block.origins.len(),
            expected_cols
        )));
    }
    Ok(rows)
}
