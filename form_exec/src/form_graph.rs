//! Formation graph resolution
//!
//! The formation graph is not a stored entity: it is the scene's adjacency
//! matrix plus the per-robot role tags, queried fresh every tick so that a
//! dynamic topology or a role change takes effect immediately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::DMatrix;

// Internal
use crate::robot::Role;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The neighbourhood of one robot for a single tick.
#[derive(Clone, Debug, Default)]
pub struct NeighbourSet {
    /// Indices of the neighbouring robots.
    pub neighbours: Vec<usize>,

    /// Index of the unique leader among the neighbours, if any.
    pub leader: Option<usize>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised while resolving the formation graph. All of these
/// are configuration errors: they abort the tick and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum FormGraphError {
    #[error("The adjacency matrix must be square, found {rows}x{cols}")]
    NonSquare { rows: usize, cols: usize },

    #[error("Robot index {index} is outside the {size}-robot adjacency matrix")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error(
        "Robots {first} and {second} are both leaders adjacent to robot \
         {index}, a robot cannot see more than one leader"
    )]
    MultipleLeaders {
        index: usize,
        first: usize,
        second: usize,
    },
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Resolve the neighbour set of the robot at `index`.
///
/// Every nonzero entry in the robot's adjacency row marks a neighbour.
/// Among the neighbours at most one may carry the leader role: finding a
/// second one is a fatal formation-graph violation, never a silent pick.
pub fn resolve_neighbours(
    adjacency: &DMatrix<u8>,
    roles: &[Option<Role>],
    index: usize,
) -> Result<NeighbourSet, FormGraphError> {
    if adjacency.nrows() != adjacency.ncols() {
        return Err(FormGraphError::NonSquare {
            rows: adjacency.nrows(),
            cols: adjacency.ncols(),
        });
    }

    if index >= adjacency.nrows() || adjacency.nrows() != roles.len() {
        return Err(FormGraphError::IndexOutOfBounds {
            index,
            size: adjacency.nrows(),
        });
    }

    let mut set = NeighbourSet::default();

    for j in 0..adjacency.ncols() {
        if adjacency[(index, j)] == 0 {
            continue;
        }

        set.neighbours.push(j);

        if roles[j] == Some(Role::Leader) {
            if let Some(first) = set.leader {
                return Err(FormGraphError::MultipleLeaders {
                    index,
                    first,
                    second: j,
                });
            }
            set.leader = Some(j);
        }
    }

    Ok(set)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn adjacency_3() -> DMatrix<u8> {
        DMatrix::from_row_slice(3, 3, &[
            0, 1, 1,
            1, 0, 0,
            1, 0, 0,
        ])
    }

    #[test]
    fn test_resolve_basic() {
        let adj = adjacency_3();
        let roles = [Some(Role::Follower), Some(Role::Leader), Some(Role::Follower)];

        let set = resolve_neighbours(&adj, &roles, 0).unwrap();
        assert_eq!(set.neighbours, vec![1, 2]);
        assert_eq!(set.leader, Some(1));

        let set = resolve_neighbours(&adj, &roles, 1).unwrap();
        assert_eq!(set.neighbours, vec![0]);
        assert_eq!(set.leader, None);
    }

    #[test]
    fn test_two_leaders_is_fatal() {
        let adj = adjacency_3();
        let roles = [Some(Role::Follower), Some(Role::Leader), Some(Role::Leader)];

        match resolve_neighbours(&adj, &roles, 0) {
            Err(FormGraphError::MultipleLeaders { index: 0, first: 1, second: 2 }) => (),
            other => panic!("expected MultipleLeaders, got {:?}", other),
        }
    }

    #[test]
    fn test_non_square_rejected() {
        let adj = DMatrix::from_row_slice(2, 3, &[0, 1, 0, 1, 0, 1]);
        let roles = [None, None];

        assert!(matches!(
            resolve_neighbours(&adj, &roles, 0),
            Err(FormGraphError::NonSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let adj = adjacency_3();
        let roles = [None, None, None];

        assert!(matches!(
            resolve_neighbours(&adj, &roles, 3),
            Err(FormGraphError::IndexOutOfBounds { index: 3, size: 3 })
        ));
    }
}
