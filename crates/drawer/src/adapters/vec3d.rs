use serde::{Deserialize, Serialize};

/// A double-precision 3D vector. Missing components decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    pub const ZERO: Vec3d = Vec3d::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compound, Node};

    #[test]
    fn test_missing_components_default() {
        let node = Node::Compound(Compound::new().with("y", 2.5f64));
        assert_eq!(
            crate::from_node::<Vec3d>(&node).unwrap(),
            Vec3d::new(0.0, 2.5, 0.0)
        );
    }

    #[test]
    fn test_flat_layout() {
        let bytes = crate::to_bytes(&Vec3d::new(1.0, -1.0, 0.5)).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..8], &1.0f64.to_be_bytes());
        assert_eq!(crate::from_bytes::<Vec3d>(&bytes).unwrap(), Vec3d::new(1.0, -1.0, 0.5));
    }
}
