use approx::assert_abs_diff_eq;
use projector::config::ConversionConfig;
use projector::{
    BandedRemapBuilder, CubeFace, CubemapLayout, Direction, Projection, RemapBuilder,
};

/// Face edges are seams shared with a neighbouring face, so a coordinate
/// within a pixel of one may round into another tile.
fn near_tile_edge(position: f64, side: f64) -> bool {
    let offset = position.rem_euclid(side);
    offset < 1.0 || offset > side - 1.0
}

#[test]
fn sphere_to_cube_and_back_returns_to_the_same_pixel() {
    let sphere = Projection::equirectangular(400, 200).unwrap();
    for layout in [CubemapLayout::Strip, CubemapLayout::Cross] {
        let cube = Projection::cubemap(64, 0, layout).unwrap();
        let to_cube = RemapBuilder::new(sphere, cube).build_maps();
        let to_sphere = RemapBuilder::new(cube, sphere).build_maps();

        let mut checked = 0;
        // Start from sphere pixels away from the poles and the wrap column.
        for y in (40..160).step_by(13) {
            for x in (10..390).step_by(17) {
                let on_cube = to_sphere.coordinate(x, y);
                if near_tile_edge(on_cube.u, 64.0) || near_tile_edge(on_cube.v, 64.0) {
                    continue;
                }
                let cube_x = on_cube.u.round() as u32;
                let cube_y = on_cube.v.round() as u32;
                checked += 1;

                let back = to_cube.coordinate(cube_x, cube_y);
                // Rounding to a cube pixel moves the ray by at most half a cube pixel.
                assert!((back.u - f64::from(x)).abs() < 2.5, "{layout:?} ({x}, {y}) -> {back:?}");
                assert!((back.v - f64::from(y)).abs() < 2.5, "{layout:?} ({x}, {y}) -> {back:?}");
            }
        }
        assert!(checked > 100, "{layout:?}: only {checked} samples away from seams");
    }
}

#[test]
fn face_centers_of_every_layout_sample_the_right_sphere_pixel() {
    let sphere = Projection::equirectangular(360, 180).unwrap();
    for layout in [CubemapLayout::Strip, CubemapLayout::Cross] {
        let cube = projector::CubemapProjection::new(90, 0, layout).unwrap();
        let table = RemapBuilder::new(sphere, Projection::from(cube)).build_maps();

        for face in CubeFace::ALL {
            let (x, y, side) = cube.face_rect(face);
            let stored = table.coordinate(x + side / 2, y + side / 2);
            let expected = sphere.direction_to_pixel(face.axis());
            assert_abs_diff_eq!(stored.u, expected.u, epsilon = 1e-3);
            assert_abs_diff_eq!(stored.v, expected.v, epsilon = 1e-3);
        }
    }
}

#[test]
fn cube_to_cube_between_layouts_moves_whole_faces() {
    let strip = projector::CubemapProjection::new(32, 0, CubemapLayout::Strip).unwrap();
    let cross = projector::CubemapProjection::new(32, 0, CubemapLayout::Cross).unwrap();
    let table = RemapBuilder::new(strip.into(), cross.into()).build_maps();

    for face in CubeFace::ALL {
        let (strip_x, strip_y, _) = strip.face_rect(face);
        let (cross_x, cross_y, _) = cross.face_rect(face);
        let stored = table.coordinate(cross_x + 10, cross_y + 21);
        assert_abs_diff_eq!(stored.u, f64::from(strip_x + 10), epsilon = 1e-3);
        assert_abs_diff_eq!(stored.v, f64::from(strip_y + 21), epsilon = 1e-3);
    }
}

#[test]
fn projections_ignore_ray_length() {
    let direction = Direction::new(-0.4, 0.1, -0.7);
    for projection in [
        Projection::equirectangular(640, 320).unwrap(),
        Projection::cubemap(50, 3, CubemapLayout::Cross).unwrap(),
    ] {
        let unit = projection.direction_to_pixel(direction.normalized_or_forward());
        for factor in [1e-3, 0.5, 42.0] {
            let scaled = projection.direction_to_pixel(direction.scaled(factor));
            assert_abs_diff_eq!(scaled.u, unit.u, epsilon = 1e-9);
            assert_abs_diff_eq!(scaled.v, unit.v, epsilon = 1e-9);
        }
    }
}

#[tokio::test]
async fn configured_conversion_builds_in_bands() {
    let config = ConversionConfig::from_toml_str(
        r#"
        [input]
        kind = "equirectangular"
        width = 360

        [output]
        kind = "cubemap"
        side_length = 90
        layout = "strip"
        "#,
    )
    .unwrap();
    let builder = config.builder().unwrap();

    let table = BandedRemapBuilder::new(builder)
        .with_band_count(4)
        .build_maps()
        .await
        .unwrap();
    assert_eq!((table.width(), table.height()), (540, 90));
    assert_eq!(table.non_finite_count(), 0);
    assert_eq!(table.map_x().as_raw(), builder.build_maps().map_x().as_raw());
}
