use nalgebra::{Point3, Vector4};

/// 立方体网格：每个面4个独立顶点（便于逐面着色），共24个顶点、36个索引
#[derive(Debug, Clone)]
pub struct CubeMesh {
    pub positions: Vec<Point3<f32>>,
    pub colors: Vec<Vector4<f32>>,
    pub indices: Vec<u16>,
}

// 前、后、上、下、右、左
const FACE_COLORS: [[f32; 4]; 6] = [
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
];

#[rustfmt::skip]
const POSITIONS: [[f32; 3]; 24] = [
    // 前
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // 后
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // 上
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
    // 下
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // 右
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // 左
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
];

impl CubeMesh {
    /// 边长为2、中心在原点的立方体
    pub fn unit() -> Self {
        let positions = POSITIONS
            .iter()
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();

        let colors = FACE_COLORS
            .iter()
            .flat_map(|c| std::iter::repeat_n(Vector4::new(c[0], c[1], c[2], c[3]), 4))
            .collect();

        // 每个面两个三角形：(0,1,2) 与 (0,2,3)
        let indices = (0..6u16)
            .flat_map(|face| {
                let base = face * 4;
                [base, base + 1, base + 2, base, base + 2, base + 3]
            })
            .collect();

        CubeMesh {
            positions,
            colors,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    /// 按索引缓冲迭代三角形
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_layout() {
        let mesh = CubeMesh::unit();
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.colors.len(), 24);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.triangles().count(), 12);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn every_vertex_sits_on_the_cube_surface() {
        let mesh = CubeMesh::unit();
        for p in &mesh.positions {
            assert_eq!(p.coords.amax(), 1.0);
        }
    }
}
