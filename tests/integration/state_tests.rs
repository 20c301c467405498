use super::{build_harness, Hook, Inert};
use hive_ui::{fields, Error, Mount, Record, Value};

#[test]
fn given_no_state_when_set_should_adopt_the_fields_and_render() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 0);

    test.engine
        .set_state(app.id, fields! { "console_msgs" => Vec::<Value>::new() })
        .unwrap();

    assert_eq!(
        test.engine.state(app.id).unwrap(),
        Some(&Record::from(fields! { "console_msgs" => Vec::<Value>::new() }))
    );
    assert_eq!(
        test.journal.entries(),
        vec![Hook::WillMount(app.id), Hook::Rendered(app.id)]
    );
}

#[test]
fn given_existing_state_when_set_should_replace_named_fields_only() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 0);
    test.engine
        .set_state(app.id, fields! { "width" => 500, "height" => 618 })
        .unwrap();

    test.engine.set_state(app.id, fields! { "width" => 700 }).unwrap();

    assert_eq!(
        test.engine.state(app.id).unwrap(),
        Some(&Record::from(fields! { "width" => 700, "height" => 618 }))
    );
}

#[test]
fn given_existing_state_when_set_with_unknown_field_should_fail_and_keep_state() {
    let mut test = build_harness();
    let app = test.mount(Mount::root(), 0);
    test.engine.set_state(app.id, fields! { "width" => 500 }).unwrap();
    test.journal.clear();

    let error = test
        .engine
        .set_state(app.id, fields! { "width" => 1, "depth" => 2 })
        .unwrap_err();

    assert!(matches!(error, Error::UnknownField(ref name) if name == "depth"));
    assert_eq!(
        test.engine.state(app.id).unwrap(),
        Some(&Record::from(fields! { "width" => 500 }))
    );
    assert!(test.journal.entries().is_empty());
}

#[test]
fn given_rendered_children_when_state_set_should_pass_matching_fields_down() {
    let mut test = build_harness();
    let parent = test.mount(Mount::root(), 0);
    let form = test.mount(Mount::child_of(parent.id).props(fields! { "form_validated" => false }), 0);
    let console = test.mount(Mount::child_of(parent.id).props(fields! { "messages" => 0 }), 0);

    parent.renders(&form);
    parent.renders(&console);
    test.engine
        .set_state(parent.id, fields! { "form_validated" => false })
        .unwrap();
    test.journal.clear();

    test.engine
        .set_state(parent.id, fields! { "form_validated" => true })
        .unwrap();

    assert_eq!(
        test.engine.props(form.id).unwrap().get("form_validated"),
        Some(&Value::Bool(true))
    );
    let entries = test.journal.entries();
    assert_eq!(
        entries[0],
        Hook::PropsIncoming(form.id, fields! { "form_validated" => true })
    );
    assert_eq!(entries[1], Hook::Rendered(parent.id));
    assert!(!entries
        .iter()
        .any(|hook| matches!(hook, Hook::PropsIncoming(id, _) if *id == console.id)));
}

#[test]
fn given_a_constructor_initializing_state_twice_should_fail() {
    let mut test = build_harness();

    let result = test.engine.mount(Mount::root(), |cx| {
        cx.init_state(fields! { "attempted_write" => false })?;
        cx.init_state(fields! { "attempted_write" => true })?;
        Ok(Inert)
    });

    assert!(matches!(result, Err(Error::StateAlreadyInitialized(_))));
}

#[test]
fn given_a_constructor_initializing_state_should_expose_it_before_any_render() {
    let mut test = build_harness();

    let app = test
        .engine
        .mount(Mount::root(), |cx| {
            cx.init_state(fields! { "hive_record_ready" => false })?;
            Ok(Inert)
        })
        .unwrap();

    assert_eq!(
        test.engine.state(app).unwrap().and_then(|state| state.get("hive_record_ready")),
        Some(&Value::Bool(false))
    );
    assert!(!test.engine.has_rendered(app).unwrap());
}
