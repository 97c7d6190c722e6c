//! End-to-end checks of the hierarchy rules through the public model API.

use cm_model::{
    Entity, EntityId, EntityKind, Feature, MoveDirection, StackRef, SubsurfaceModel, SurfaceRef,
};
use proptest::prelude::*;

fn stack_id(model: &SubsurfaceModel, name: &str) -> EntityId {
    model.stacks().stack_by_name(name).unwrap().id().clone()
}

fn stack_names(model: &SubsurfaceModel) -> Vec<String> {
    model
        .stacks()
        .as_list()
        .iter()
        .map(|stack| stack.name.clone())
        .collect()
}

#[test]
fn basement_stays_pinned_at_the_bottom() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("S1", Feature::Erosion).unwrap();
    model.add_stack("S2", Feature::Onlap).unwrap();

    let basement = stack_id(&model, "Basement");
    let actions = model.stacks().allowed_actions(Some(&basement));
    assert!(!actions.remove && !actions.up && !actions.down);

    // Nothing may move into the basement slot either.
    let s1 = stack_id(&model, "S1");
    assert!(!model.stacks().allowed_actions(Some(&s1)).down);

    model.select(EntityKind::Stack, &s1);
    assert!(!model.move_selected(EntityKind::Stack, MoveDirection::Down));
    assert_eq!(stack_names(&model), ["Basement", "S1", "S2"]);
}

#[test]
fn new_stack_is_inserted_below_the_oldest_fault() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("F1", Feature::Fault).unwrap();
    model.add_stack("F2", Feature::Fault).unwrap();
    model.add_stack("S1", Feature::Erosion).unwrap();

    assert_eq!(stack_names(&model), ["Basement", "S1", "F1", "F2"]);

    // Faults keep appending at the end.
    model.add_stack("F3", Feature::Fault).unwrap();
    assert_eq!(stack_names(&model), ["Basement", "S1", "F1", "F2", "F3"]);
}

#[test]
fn faults_do_not_mix_with_structural_stacks() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("S1", Feature::Erosion).unwrap();
    model.add_stack("F1", Feature::Fault).unwrap();

    let f1 = stack_id(&model, "F1");
    let s1 = stack_id(&model, "S1");
    assert!(!model.stacks().allowed_actions(Some(&f1)).down);
    assert!(!model.stacks().allowed_actions(Some(&s1)).up);

    model.select(EntityKind::Stack, &f1);
    assert!(!model.move_selected(EntityKind::Stack, MoveDirection::Down));
    assert_eq!(stack_names(&model), ["Basement", "S1", "F1"]);
}

#[test]
fn fault_stack_accepts_exactly_one_surface() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("F1", Feature::Fault).unwrap();
    assert!(model.add_surface(StackRef::Name("F1"), "plane").is_some());
    assert!(model.add_surface(StackRef::Name("F1"), "second").is_none());

    let fault = model.stacks().stack_by_name("F1").unwrap();
    assert_eq!(fault.surfaces().len(), 1);
}

#[test]
fn basement_surface_is_immutable_from_the_outside() {
    let mut model = SubsurfaceModel::new();
    assert!(model.add_surface(StackRef::Name("Basement"), "extra").is_none());

    let basement = model.stacks().stack_by_name("Basement").unwrap();
    let surface = basement.surfaces().iter().next().unwrap().id().clone();
    let actions = basement.surface_actions(Some(&surface));
    assert!(!actions.add && !actions.remove && !actions.up && !actions.down);
}

#[test]
fn removing_a_stack_reports_its_surfaces() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("S1", Feature::Erosion).unwrap();
    let a = model.add_surface(StackRef::Name("S1"), "A").unwrap();
    let b = model.add_surface(StackRef::Name("S1"), "B").unwrap();
    model.add_point(SurfaceRef::Id(&a), 0.0, 0.0, 0.0).unwrap();

    let s1 = stack_id(&model, "S1");
    let removed = model.remove(EntityKind::Stack, &s1).unwrap();
    match removed {
        cm_model::Removed::Stack { surfaces } => assert_eq!(surfaces, vec![a, b]),
        other => panic!("unexpected removal outcome: {other:?}"),
    }
    assert!(model.stacks().stack_by_name("S1").is_none());
}

#[test]
fn selection_cascades_down_through_the_panes() {
    let mut model = SubsurfaceModel::new();
    model.add_stack("S1", Feature::Erosion).unwrap();
    let a = model.add_surface(StackRef::Name("S1"), "A").unwrap();
    model.add_point(SurfaceRef::Id(&a), 1.0, 1.0, 1.0).unwrap();

    // No stack selected: surface selection has no target.
    assert!(!model.select(EntityKind::Surface, &a));

    let s1 = stack_id(&model, "S1");
    model.select(EntityKind::Stack, &s1);
    assert!(model.select(EntityKind::Surface, &a));
    assert_eq!(model.selected_surface().map(|s| s.name.as_str()), Some("A"));
}

proptest! {
    /// Ids are never reused, whatever the add/remove interleaving.
    #[test]
    fn point_ids_are_unique_across_removals(ops in proptest::collection::vec(any::<bool>(), 1..40)) {
        let mut model = SubsurfaceModel::new();
        model.add_stack("S1", Feature::Erosion).unwrap();
        let surface = model.add_surface(StackRef::Name("S1"), "A").unwrap();
        let s1 = model.stacks().stack_by_name("S1").unwrap().id().clone();
        model.select(EntityKind::Stack, &s1);
        model.select(EntityKind::Surface, &surface);

        let mut seen: Vec<EntityId> = Vec::new();
        let mut live: Vec<EntityId> = Vec::new();
        for add in ops {
            if add || live.is_empty() {
                let handle = model
                    .add_point(SurfaceRef::Id(&surface), 0.0, 0.0, 0.0)
                    .unwrap();
                prop_assert!(!seen.contains(&handle.id));
                seen.push(handle.id.clone());
                live.push(handle.id);
            } else {
                let id = live.pop().unwrap();
                prop_assert!(model.remove(EntityKind::Point, &id).is_some());
            }
        }
    }

    /// A permitted move followed by its inverse restores the order.
    #[test]
    fn stack_move_up_then_down_is_identity(pick in 0usize..4) {
        let mut model = SubsurfaceModel::new();
        model.add_stack("S1", Feature::Erosion).unwrap();
        model.add_stack("S2", Feature::Onlap).unwrap();
        model.add_stack("S3", Feature::Erosion).unwrap();
        model.add_stack("F1", Feature::Fault).unwrap();

        let names = ["S1", "S2", "S3", "F1"];
        let id = stack_id(&model, names[pick]);
        model.select(EntityKind::Stack, &id);

        let before = stack_names(&model);
        if model.move_selected(EntityKind::Stack, MoveDirection::Up) {
            prop_assert!(model.move_selected(EntityKind::Stack, MoveDirection::Down));
        }
        prop_assert_eq!(stack_names(&model), before);
    }
}
