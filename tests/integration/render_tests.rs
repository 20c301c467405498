use super::{build_harness, Hook, Inert};
use hive_ui::{fields, Error, Layout, Mount, Record, RecordingWidget, WidgetEvent};

fn unpositioned_everywhere() -> Vec<WidgetEvent> {
    Layout::ALL.iter().map(|layout| WidgetEvent::Unpositioned(*layout)).collect()
}

#[test]
fn given_a_never_rendered_component_when_rendered_twice_should_mount_once() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 0);

    assert!(!test.engine.has_rendered(app.id).unwrap());

    test.engine.render(app.id).unwrap();
    test.engine.render(app.id).unwrap();

    assert!(test.engine.has_rendered(app.id).unwrap());
    assert_eq!(
        test.journal.entries(),
        vec![
            Hook::WillMount(app.id),
            Hook::Rendered(app.id),
            Hook::Rendered(app.id),
        ]
    );
}

#[test]
fn given_mounted_components_should_have_distinct_ids_and_parent_links() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 0);
    let first = test.mount(Mount::child_of(parent.id), 0);
    let second = test.mount(Mount::child_of(parent.id), 0);

    assert_ne!(first.id, second.id);
    assert!(parent.id < first.id && first.id < second.id);
    assert_eq!(test.engine.len(), 3);
    assert_eq!(test.engine.parent(first.id).unwrap(), Some(parent.id));
    assert_eq!(test.engine.parent(parent.id).unwrap(), None);
    assert_eq!(
        test.engine.children(parent.id).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![second.id, first.id]
    );
}

#[test]
fn given_a_child_that_skips_a_widget_when_parent_renders_should_unposition_it_once() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 0);
    let a = test.mount(Mount::child_of(parent.id), 2);
    let b = test.mount(Mount::child_of(parent.id), 1);

    parent.renders(&a);
    parent.renders(&b);
    a.shows(0, Layout::Pack);
    b.shows(0, Layout::Grid);

    test.engine.render(parent.id).unwrap();

    assert_eq!(a.logs[0].events(), vec![WidgetEvent::Positioned(Layout::Pack)]);
    assert_eq!(a.logs[1].events(), unpositioned_everywhere());
    assert_eq!(b.logs[0].events(), vec![WidgetEvent::Positioned(Layout::Grid)]);
    assert!(!test.engine.is_hidden(a.id).unwrap());
    assert!(!test.engine.is_hidden(b.id).unwrap());
}

#[test]
fn given_render_cycles_should_keep_renders_within_children_and_reset_them() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 1);
    let a = test.mount(Mount::child_of(parent.id), 0);
    let b = test.mount(Mount::child_of(parent.id), 0);

    parent.renders(&a);
    parent.renders(&b);
    parent.shows(0, Layout::Place);
    test.engine.render(parent.id).unwrap();

    let renders: Vec<_> = test.engine.renders(parent.id).unwrap().iter().copied().collect();
    assert_eq!(renders, vec![b.id, a.id]);
    for child in &renders {
        assert!(test.engine.children(parent.id).unwrap().contains(child));
    }
    for widget in test.engine.widget_renders(parent.id).unwrap() {
        assert!(test.engine.widgets(parent.id).unwrap().contains(widget));
    }

    parent.plan().children = vec![a.id];
    parent.plan().positions.clear();
    test.engine.render(parent.id).unwrap();

    let renders: Vec<_> = test.engine.renders(parent.id).unwrap().iter().copied().collect();
    assert_eq!(renders, vec![a.id]);
    assert!(test.engine.widget_renders(parent.id).unwrap().is_empty());
}

#[test]
fn given_a_skipped_child_should_forget_it_once_and_skip_it_while_hidden() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 0);
    let a = test.mount(Mount::child_of(parent.id), 0);
    let b = test.mount(Mount::child_of(parent.id), 1);

    parent.renders(&a);
    parent.renders(&b);
    b.shows(0, Layout::Pack);
    test.engine.render(parent.id).unwrap();
    b.logs[0].clear();

    parent.plan().children = vec![a.id];
    test.engine.render(parent.id).unwrap();

    assert!(test.engine.is_hidden(b.id).unwrap());
    assert_eq!(b.logs[0].events(), unpositioned_everywhere());

    test.engine.render(parent.id).unwrap();
    test.engine.render(parent.id).unwrap();

    assert_eq!(b.logs[0].count(), 3);
}

#[test]
fn given_a_hidden_child_when_rendered_again_should_mount_it_again() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 0);
    let child = test.mount(Mount::child_of(parent.id), 0);

    parent.renders(&child);
    test.engine.render(parent.id).unwrap();
    parent.plan().children.clear();
    test.engine.render(parent.id).unwrap();
    assert!(test.engine.is_hidden(child.id).unwrap());

    parent.renders(&child);
    test.engine.render(parent.id).unwrap();

    assert!(!test.engine.is_hidden(child.id).unwrap());
    assert_eq!(test.journal.count(&Hook::WillMount(child.id)), 2);
}

#[test]
fn given_a_forgotten_branch_should_only_hide_its_own_widgets() {
    let mut test = build_harness();
    let root = test.mount(Mount::root(), 0);
    let middle = test.mount(Mount::child_of(root.id), 1);
    let leaf = test.mount(Mount::child_of(middle.id), 1);

    root.renders(&middle);
    middle.renders(&leaf);
    middle.shows(0, Layout::Pack);
    leaf.shows(0, Layout::Pack);
    test.engine.render(root.id).unwrap();

    root.plan().children.clear();
    test.engine.render(root.id).unwrap();

    assert!(test.engine.is_hidden(middle.id).unwrap());
    assert_eq!(middle.logs[0].count_of(&WidgetEvent::Unpositioned(Layout::Pack)), 1);
    assert!(!test.engine.is_hidden(leaf.id).unwrap());
    assert_eq!(leaf.logs[0].events(), vec![WidgetEvent::Positioned(Layout::Pack)]);
}

#[test]
fn given_a_component_rendering_itself_should_fail_as_reentrant() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 0);
    app.plan().children.push(app.id);

    let error = test.engine.render(app.id).unwrap_err();
    assert!(matches!(error, Error::ReentrantRender(id) if id == app.id));

    app.plan().children.clear();
    test.engine.render(app.id).unwrap();
}

#[test]
fn given_a_pinned_widget_should_never_unposition_it() {
    let mut test = build_harness();
    let frame = RecordingWidget::new();
    let label = RecordingWidget::new();
    let (frame_log, label_log) = (frame.log(), label.log());

    let app = test
        .engine
        .mount(Mount::root(), |cx| {
            cx.add_pinned_widget(frame)?;
            cx.add_widget(label)?;
            Ok(Inert)
        })
        .unwrap();

    test.engine.render(app).unwrap();
    test.engine.forget(app).unwrap();

    assert!(frame_log.events().is_empty());
    assert_eq!(label_log.count(), 6);
    assert!(test.engine.is_hidden(app).unwrap());
}

#[test]
fn given_a_widget_configured_outside_render_should_not_count_as_rendered() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 1);

    let options = Record::from(fields! { "state" => "disabled" });
    test.engine.configure_widget(app.widgets[0], &options).unwrap();
    test.engine.render(app.id).unwrap();

    assert_eq!(test.engine.widget_owner(app.widgets[0]).unwrap(), app.id);
    assert_eq!(
        app.logs[0].events()[0],
        WidgetEvent::Configured("Record(state=\"disabled\")".to_owned())
    );
    assert_eq!(app.logs[0].count(), 4);
}
