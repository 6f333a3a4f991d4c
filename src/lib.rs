pub mod error;
pub mod layer;
pub mod math;
pub mod mesh;
pub mod optimize;
pub mod tile;

pub use error::{BuildWarning, Result, TilemeshError};
pub use layer::{
    build_face_mesh, build_wall_mesh, FaceConfig, Layer, LayerKind, Map, MeshBuild,
    SubwallProfile, WallConfig,
};
pub use mesh::MeshBuffer;
pub use optimize::{optimize_tiles, TileLayerKind};
pub use tile::{GridPlacement, Tile, TileSet, TileToLocal};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_thread_safe() {
        assert_send_sync::<Map>();
        assert_send_sync::<MeshBuild>();
        assert_send_sync::<TilemeshError>();
    }
}
