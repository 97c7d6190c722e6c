//! Session flows exercised against the recording engine and a
//! collecting sink.

use std::io::Write;

use cm_engine::{EngineCall, RecordingEngine};
use cm_model::{Entity, EntityKind, Feature, MoveDirection, StackRef, SurfaceRef};
use cm_session::{Modeler, SessionError};
use cm_state::{CollectingSink, StateKey};

fn session() -> Modeler<RecordingEngine, CollectingSink> {
    Modeler::new(RecordingEngine::new(), CollectingSink::new())
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn bootstrap_initializes_engine_and_pushes_everything() {
    let session = session();
    let calls = &session.engine().calls;

    assert!(matches!(calls[0], EngineCall::InitData { .. }));
    assert!(calls.iter().any(|call| matches!(call, EngineCall::AddSurface(_))));

    let keys = session.sink().keys();
    for key in StateKey::ALL {
        assert!(keys.contains(&key), "missing bootstrap push for {key}");
    }
}

#[test]
fn adding_a_surface_mirrors_into_the_engine() {
    let mut session = session();
    session.add_stack("S1", Feature::Erosion).unwrap();
    session.engine_mut().clear();
    session.sink_mut().clear();

    let id = session.add_surface(StackRef::Name("S1"), "A").unwrap();

    let calls = &session.engine().calls;
    assert_eq!(calls[0], EngineCall::AddSurface(id));
    assert!(calls.iter().any(|call| matches!(call, EngineCall::MapStackToSurfaces(_))));

    let keys = session.sink().keys();
    assert!(keys.contains(&StateKey::Surfaces));
    assert!(!keys.contains(&StateKey::Stacks));
}

#[test]
fn rejected_removal_still_republishes_the_panes() {
    let mut session = session();
    session.add_stack("S1", Feature::Erosion).unwrap();
    let surface = session.add_surface(StackRef::Name("S1"), "A").unwrap();
    session.engine_mut().clear();
    session.sink_mut().clear();

    // No stack selected, so surface removal is refused.
    session.remove(EntityKind::Surface, &surface);

    assert!(session.engine().calls.is_empty());
    assert!(session.sink().keys().contains(&StateKey::Surfaces));
    assert!(session.model().stacks().surface_by_id(&surface).is_some());
}

#[test]
fn removing_a_stack_deletes_its_surfaces_and_reflags_faults() {
    let mut session = session();
    session.add_stack("S1", Feature::Erosion).unwrap();
    session.add_stack("F1", Feature::Fault).unwrap();
    let plane = session.add_surface(StackRef::Name("F1"), "plane").unwrap();
    let a = session.add_surface(StackRef::Name("S1"), "A").unwrap();
    let s1 = session.model().stacks().stack_by_name("S1").unwrap().id().clone();
    session.engine_mut().clear();

    session.remove(EntityKind::Stack, &s1);

    let calls = &session.engine().calls;
    assert!(calls.contains(&EngineCall::DeleteSurface(a)));
    assert!(calls.iter().any(|call| {
        matches!(call, EngineCall::SetIsFault(faults) if !faults.is_empty())
    }));
    assert!(session.model().stacks().surface_by_id(&plane).is_some());
}

#[test]
fn moving_a_surface_reorders_and_refreshes_colors() {
    let mut session = session();
    session.add_stack("S1", Feature::Erosion).unwrap();
    let a = session.add_surface(StackRef::Name("S1"), "A").unwrap();
    session.add_surface(StackRef::Name("S1"), "B").unwrap();
    let s1 = session.model().stacks().stack_by_name("S1").unwrap().id().clone();
    session.select(EntityKind::Stack, &s1);
    session.select(EntityKind::Surface, &a);

    session.engine_mut().colors = vec![(a.clone(), "#123456".to_owned())];
    session.engine_mut().clear();
    session.move_entity(EntityKind::Surface, MoveDirection::Up);

    assert!(session.engine().calls.iter().any(|call| {
        matches!(call, EngineCall::ReorderFeatures(_))
    }));
    let surface = session.model().stacks().surface_by_id(&a).unwrap();
    assert_eq!(surface.color, "#123456");
}

#[test]
fn grid_update_reinitializes_engine_data() {
    let mut session = session();
    session.sink_mut().clear();
    session.engine_mut().clear();

    let changed = session
        .update_grid([0.0, 10.0, 0.0, 10.0, 0.0, 10.0], [5, 5, 5])
        .unwrap();
    assert!(changed);
    assert!(matches!(
        session.engine().calls[0],
        EngineCall::InitData { resolution: [5, 5, 5], .. }
    ));
    assert_eq!(
        session.sink().keys(),
        vec![StateKey::Grid, StateKey::Topography]
    );

    // Idempotent update: no engine call, no push.
    session.engine_mut().clear();
    session.sink_mut().clear();
    let changed = session
        .update_grid([0.0, 10.0, 0.0, 10.0, 0.0, 10.0], [5, 5, 5])
        .unwrap();
    assert!(!changed);
    assert!(session.engine().calls.is_empty());
    assert!(session.sink().keys().is_empty());
}

#[test]
fn points_csv_applies_valid_prefix_then_fails() {
    let mut session = session();
    session.add_stack("S1", Feature::Erosion).unwrap();
    session.add_surface(StackRef::Name("S1"), "A").unwrap();

    let csv = b"X,Y,Z,formation\n1,2,3,A\n4,5,6,A\nbad,8,9,A\n10,11,12,A\n";
    let result = session.import_data("points.csv", csv);
    assert!(result.is_err());

    let s1 = session.model().stacks().stack_by_name("S1").unwrap();
    let surface = s1.surface_by_name("A").unwrap();
    assert_eq!(surface.points.as_list().len(), 2);
}

#[test]
fn stacks_csv_respects_order_column() {
    let mut session = session();
    let csv = b"stack,feature,order\nUpper,Erosion,2\nLower,Onlap,1\n";
    session.import_data("stacks.csv", csv).unwrap();

    let names: Vec<String> = session
        .model()
        .stacks()
        .as_list()
        .iter()
        .map(|stack| stack.name.clone())
        .collect();
    assert_eq!(names, ["Basement", "Lower", "Upper"]);
}

#[test]
fn bundle_import_populates_the_whole_session() {
    let mut session = session();
    let archive = build_zip(&[
        (
            "grid.csv",
            b"xmin,xmax,ymin,ymax,zmin,zmax,nx,ny,nz\n0,50,0,50,0,50,5,5,5\n".as_slice(),
        ),
        ("stacks.csv", b"stack,feature,order\nS1,Erosion,1\n".as_slice()),
        ("surfaces.csv", b"formation,stack,order\nA,S1,1\n".as_slice()),
        ("points.csv", b"X,Y,Z,formation\n1,2,3,A\n".as_slice()),
        (
            "orientations.csv",
            b"X,Y,Z,dip,azimuth,polarity,formation\n1,2,3,45,90,1,A\n".as_slice(),
        ),
    ]);

    session.import_data("model.zip", &archive).unwrap();

    assert_eq!(session.model().grid().resolution(), [5, 5, 5]);
    let surface = session.model().stacks().surface_by_name("A").unwrap();
    assert_eq!(surface.points.as_list().len(), 1);
    assert_eq!(surface.orientations.as_list().len(), 1);
}

#[test]
fn full_model_round_trip_rebuilds_the_engine() {
    let mut source = session();
    source.add_stack("S1", Feature::Erosion).unwrap();
    let a = source.add_surface(StackRef::Name("S1"), "A").unwrap();
    source.add_point(SurfaceRef::Id(&a), 1.0, 2.0, 3.0).unwrap();
    let json = serde_json::to_vec(&source.export()).unwrap();

    let mut target = session();
    target.engine_mut().clear();
    target.import_data("full-model.json", &json).unwrap();

    let calls = &target.engine().calls;
    assert!(matches!(calls[0], EngineCall::InitData { .. }));
    assert!(calls.iter().any(|call| matches!(call, EngineCall::AddSurfacePoint { .. })));
    assert!(target.model().stacks().surface_by_name("A").is_some());
}

#[test]
fn incompatible_snapshot_is_rejected() {
    let mut source = session();
    let mut snapshot = source.export();
    snapshot.version = 99;
    let json = serde_json::to_vec(&snapshot).unwrap();

    let result = source.import_data("full-model.json", &json);
    assert!(matches!(result, Err(SessionError::IncompatibleSnapshot)));
}

#[test]
fn unknown_payload_is_refused() {
    let mut session = session();
    let result = session.import_data("notes.txt", b"hello");
    assert!(matches!(
        result,
        Err(SessionError::UnsupportedPayload { .. })
    ));
}
