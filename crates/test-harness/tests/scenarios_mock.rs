//! Workflow scenarios over the deterministic mock kernel.

use charm_types::{LoopParams, PlateShape, Vec2};
use forge_ops::fit_logo;
use scene_engine::{ConfigPatch, CONTACT_CLEARANCE_MM};
use test_harness::{rect_shape, ConfiguratorRig};

#[test]
fn fit_scenario_76_by_38_onto_38() {
    // Two parts spanning a combined 76 × 38 box.
    let batch = vec![
        rect_shape(1, 0.0, 0.0, 40.0, 38.0),
        rect_shape(2, 50.0, 5.0, 26.0, 20.0),
    ];
    let placement = fit_logo(&batch, 38.0);
    assert_eq!(placement.scale, 0.5);
}

#[test]
fn design_session_from_default_to_snapshot() {
    let mut rig = ConfiguratorRig::mock();

    // Configure the plate.
    rig.studio.apply(ConfigPatch::SetPlateShape {
        shape: PlateShape::RoundedRect,
    });
    rig.studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 4.0 });
    rig.studio.apply(ConfigPatch::SetAttachmentLoop {
        attachment_loop: Some(LoopParams {
            offset: Vec2::new(-17.0, 0.0),
        }),
    });

    // Drop in artwork and nudge it around.
    rig.studio.apply(ConfigPatch::ReplaceArtwork {
        shapes: vec![rect_shape(1, 0.0, 0.0, 20.0, 10.0)],
    });
    rig.studio.apply(ConfigPatch::SetLogoOffset {
        offset: Vec2::new(2.0, -1.0),
    });
    rig.studio.apply(ConfigPatch::SetLogoRotation { rotation_deg: 15.0 });

    let scene = rig.studio.frame();
    assert!(scene.plate_fallback.is_none());
    assert_eq!(scene.logos.len(), 1);

    // The composed logo touches the plate top minus the clearance.
    assert!((scene.logo_z_offset - (4.0 - CONTACT_CLEARANCE_MM)).abs() < 1e-9);

    let png = rig.studio.capture_snapshot().unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn svg_upload_drives_the_whole_pipeline() {
    // Same artwork, two entry points: the raw importer and the studio's
    // upload path must agree.
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 76 38">
        <rect id="banner" x="0" y="0" width="76" height="38" fill="#204080"/>
    </svg>"##;
    let shapes = vector_import::import_vector(svg).unwrap();
    assert_eq!(fit_logo(&shapes, 38.0).scale, 0.5);

    let mut rig = ConfiguratorRig::mock();
    rig.studio.import_artwork(svg).unwrap();
    assert_eq!(rig.studio.config().batch.len(), 1);
    assert_eq!(rig.studio.config().batch[0].name, "banner");

    let scene = rig.studio.frame();
    assert_eq!(scene.logos.len(), 1);
}

#[test]
fn slider_drags_between_frames_stay_consistent() {
    let mut rig = ConfiguratorRig::mock();
    rig.studio.apply(ConfigPatch::ReplaceArtwork {
        shapes: vec![rect_shape(1, 0.0, 0.0, 10.0, 10.0)],
    });

    // Interleave frames with depth drags like a live slider.
    for depth in [2.0, 3.5, 5.0, 1.0] {
        rig.studio.apply(ConfigPatch::SetPlateDepth { depth_mm: depth });
        let scene = rig.studio.frame();
        assert!(
            (scene.logo_z_offset - (depth - CONTACT_CLEARANCE_MM)).abs() < 1e-9,
            "logo must track the plate top at depth {}",
            depth
        );
    }
}

#[test]
fn logo_depth_edit_keeps_contact() {
    let mut rig = ConfiguratorRig::mock();
    rig.studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 3.0 });
    rig.studio.apply(ConfigPatch::ReplaceArtwork {
        shapes: vec![rect_shape(1, 0.0, 0.0, 10.0, 10.0)],
    });
    rig.studio.frame();

    rig.studio.apply(ConfigPatch::SetLogoDepth { depth_mm: 2.4 });
    let scene = rig.studio.frame();
    // Logo solids start at z = 0 regardless of their depth, so contact
    // means the same offset; the group just got taller.
    assert!((scene.logo_z_offset - (3.0 - CONTACT_CLEARANCE_MM)).abs() < 1e-9);
    let top = scene.logos[0].mesh.max_z().unwrap();
    assert!((top - 2.4).abs() < 1e-9);
}

#[test]
fn replacing_artwork_discards_previous_batch_entirely() {
    let mut rig = ConfiguratorRig::mock();
    rig.studio.apply(ConfigPatch::ReplaceArtwork {
        shapes: vec![
            rect_shape(1, 0.0, 0.0, 10.0, 10.0),
            rect_shape(2, 20.0, 0.0, 10.0, 10.0),
        ],
    });
    rig.studio.frame();
    assert_eq!(rig.studio.scene().logos.len(), 2);

    rig.studio.apply(ConfigPatch::ReplaceArtwork {
        shapes: vec![rect_shape(7, 0.0, 0.0, 44.0, 22.0)],
    });
    let scene = rig.studio.frame();
    assert_eq!(scene.logos.len(), 1);
    assert_eq!(scene.logos[0].shape_id, 7);
}
