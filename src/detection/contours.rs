use crate::detection::edges::{EDGE_VALUE, EdgeMap};
use crate::error::CoverageError;
use crate::models::{Contour, Point};

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Scratch state shared by every fill over one edge map. Both buffers are
/// sized once and indexed by `y * width + x`.
struct FillArena {
    visited: Vec<bool>,
    stack: Vec<usize>,
}

impl FillArena {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            stack: Vec::with_capacity(1024),
        }
    }
}

/// Label 8-connected groups of edge pixels and keep those with at least
/// `min_area` pixels. Components are discovered in row-major order of their
/// first pixel, so the output order is stable for identical input.
pub fn find_contours(
    edges: &EdgeMap,
    min_area: u32,
    retain_points: bool,
) -> Result<Vec<Contour>, CoverageError> {
    let width = edges.width as usize;
    let height = edges.height as usize;
    let expected = width * height;
    if edges.data.len() != expected {
        return Err(CoverageError::MalformedEdgeMap {
            width: edges.width,
            height: edges.height,
            expected,
            actual: edges.data.len(),
        });
    }

    let mut arena = FillArena::new(expected);
    let mut contours = Vec::new();

    for (index, &value) in edges.data.iter().enumerate() {
        match value {
            0 => continue,
            EDGE_VALUE => {}
            _ => return Err(CoverageError::NonBinaryEdgeValue { index, value }),
        }
        if arena.visited[index] {
            continue;
        }

        let contour = flood_fill(edges, &mut arena, index, retain_points)?;
        if contour.pixel_count >= min_area {
            contours.push(contour);
        }
    }

    Ok(contours)
}

/// Iterative fill from `start`, marking every reached pixel visited.
fn flood_fill(
    edges: &EdgeMap,
    arena: &mut FillArena,
    start: usize,
    retain_points: bool,
) -> Result<Contour, CoverageError> {
    let width = edges.width as usize;
    let height = edges.height as i64;
    let start_x = (start % width) as u32;
    let start_y = (start / width) as u32;

    let mut contour = Contour {
        min_x: start_x,
        min_y: start_y,
        max_x: start_x,
        max_y: start_y,
        pixel_count: 0,
        points: Vec::new(),
    };

    arena.stack.clear();
    arena.stack.push(start);
    arena.visited[start] = true;

    while let Some(index) = arena.stack.pop() {
        let x = (index % width) as u32;
        let y = (index / width) as u32;

        contour.pixel_count += 1;
        contour.min_x = contour.min_x.min(x);
        contour.max_x = contour.max_x.max(x);
        contour.min_y = contour.min_y.min(y);
        contour.max_y = contour.max_y.max(y);
        if retain_points {
            contour.points.push(Point { x, y });
        }

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height {
                continue;
            }
            let neighbor = ny as usize * width + nx as usize;
            if arena.visited[neighbor] {
                continue;
            }
            match edges.data[neighbor] {
                0 => {}
                EDGE_VALUE => {
                    arena.visited[neighbor] = true;
                    arena.stack.push(neighbor);
                }
                value => {
                    return Err(CoverageError::NonBinaryEdgeValue { index: neighbor, value });
                }
            }
        }
    }

    Ok(contour)
}
