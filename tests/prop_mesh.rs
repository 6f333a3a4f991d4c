#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use tilemesh::math::IntPoint2;
use tilemesh::mesh::MeshBuffer;
use tilemesh::tile::AdjacencyResolver;
use tilemesh::{
    build_face_mesh, build_wall_mesh, optimize_tiles, FaceConfig, GridPlacement, SubwallProfile,
    Tile, TileLayerKind, WallConfig,
};

fn arb_unit_edges() -> impl Strategy<Value = Vec<Tile>> {
    prop::collection::vec((0..5_i32, 0..5_i32, any::<bool>()), 0..25).prop_map(|edges| {
        edges
            .into_iter()
            .map(|(x, y, horizontal)| {
                let to = if horizontal {
                    IntPoint2::new(x + 1, y)
                } else {
                    IntPoint2::new(x, y + 1)
                };
                Tile::new(IntPoint2::new(x, y), to)
            })
            .collect()
    })
}

fn arb_subwalls() -> impl Strategy<Value = Vec<SubwallProfile>> {
    prop::collection::vec((1..4_u32, any::<bool>(), 0.0..0.5_f32), 1..4).prop_map(|profiles| {
        profiles
            .into_iter()
            .map(|(steps, smooth, bottom)| {
                SubwallProfile::default()
                    .with_anchors(bottom, 1.0)
                    .with_steps(steps, smooth)
            })
            .collect()
    })
}

fn assert_well_formed(mesh: &MeshBuffer) -> Result<(), TestCaseError> {
    prop_assert_eq!(mesh.triangles.len() % 3, 0);
    prop_assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    prop_assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    prop_assert_eq!(mesh.colors.len(), mesh.vertices.len());
    prop_assert_eq!(mesh.normals.len(), mesh.vertices.len());
    prop_assert_eq!(mesh.tangents.len(), mesh.vertices.len());
    prop_assert_eq!(mesh.materials.len(), mesh.sub_meshes.len());

    // Sub-meshes tile the index list in order.
    let mut expected_start = 0;
    for range in &mesh.sub_meshes {
        prop_assert_eq!(range.start, expected_start);
        prop_assert_eq!(range.count % 3, 0);
        expected_start = range.end();
    }
    prop_assert_eq!(expected_start, mesh.triangles.len());
    Ok(())
}

proptest! {
    #[test]
    fn wall_mesh_is_well_formed(edges in arb_unit_edges(), subwalls in arb_subwalls()) {
        let config = WallConfig::new(2.0, 0.2, subwalls);
        let build = build_wall_mesh(&edges, &config, &GridPlacement::default()).unwrap();
        assert_well_formed(&build.mesh)?;
        prop_assert_eq!(build.mesh.sub_meshes.len(), config.subwalls.len());
    }

    #[test]
    fn face_mesh_is_well_formed(cells in prop::collection::vec((0..6_i32, 0..6_i32), 0..30)) {
        let cells: Vec<Tile> = cells.into_iter().map(|(x, y)| Tile::cell(x, y)).collect();
        let build = build_face_mesh(&cells, &FaceConfig::default(), &GridPlacement::default())
            .unwrap();
        assert_well_formed(&build.mesh)?;
        prop_assert_eq!(build.mesh.sub_meshes.len(), 1);
    }

    // Caps appear only at ends with no neighbour, so joined runs have no
    // internal seams.
    #[test]
    fn caps_only_at_open_ends(edges in arb_unit_edges(), steps in 1..4_u32) {
        let config = WallConfig::new(
            1.0,
            0.2,
            vec![SubwallProfile::default().with_steps(steps, true)],
        );
        let build = build_wall_mesh(&edges, &config, &GridPlacement::default()).unwrap();

        let optimized = optimize_tiles(&edges, TileLayerKind::Edge);
        let resolver = AdjacencyResolver::new(&optimized);
        let faces: usize = optimized
            .iter()
            .map(|tile| {
                let adjacency = resolver.resolve(tile);
                2 + usize::from(adjacency.head.is_open()) + usize::from(adjacency.tail.is_open())
            })
            .sum();
        prop_assert_eq!(build.mesh.triangle_count(), faces * 2 * steps as usize);
    }
}
