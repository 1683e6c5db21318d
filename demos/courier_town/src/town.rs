//! Synthetic street grid used when no map file is given.

use fd_graph::{EdgeRecord, GraphSnapshot, NodeRecord};

pub const GRID: usize = 10;
/// Block length in map units.
pub const BLOCK: f64 = 200.0;

/// A `GRID × GRID` street grid.  Restaurants cluster around the centre,
/// customers are spread over the outer blocks, and the middle avenue is
/// congested.
pub fn build_town() -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::default();
    let key = |row: usize, col: usize| -> String {
        let n = row * GRID + col;
        let centre = (3..7).contains(&row) && (3..7).contains(&col);
        if centre && n % 3 == 0 {
            format!("R{n}")
        } else if !centre && n % 7 == 2 {
            format!("C{n}")
        } else {
            format!("N{n}")
        }
    };

    for row in 0..GRID {
        for col in 0..GRID {
            snapshot.nodes.push(NodeRecord {
                id:         key(row, col),
                x:          col as f64 * BLOCK,
                y:          row as f64 * BLOCK,
                order_rate: None,
            });
        }
    }
    for row in 0..GRID {
        for col in 0..GRID {
            if col + 1 < GRID {
                snapshot.edges.push(EdgeRecord {
                    source:      key(row, col),
                    target:      key(row, col + 1),
                    obstruction: if row == GRID / 2 { 1.8 } else { 1.0 },
                    one_way:     false,
                });
            }
            if row + 1 < GRID {
                snapshot.edges.push(EdgeRecord {
                    source:      key(row, col),
                    target:      key(row + 1, col),
                    obstruction: 1.0,
                    one_way:     false,
                });
            }
        }
    }
    snapshot
}
