use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution slot handed to every scenario iteration.
///
/// `id` starts at 1; `iteration` counts the iterations this VU already
/// started, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualUser {
    pub id: u32,
    pub iteration: u64,
}

impl VirtualUser {
    pub fn new(id: u32) -> Self {
        Self { id, iteration: 0 }
    }

    /// Same VU, next iteration
    pub fn next(self) -> Self {
        Self {
            iteration: self.iteration + 1,
            ..self
        }
    }
}

impl fmt::Display for VirtualUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vu{}#{}", self.id, self.iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_keeps_id() {
        let vu = VirtualUser::new(5).next().next();
        assert_eq!(vu.id, 5);
        assert_eq!(vu.iteration, 2);
        assert_eq!(vu.to_string(), "vu5#2");
    }
}
