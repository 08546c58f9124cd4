use typelog::{
    CONTINUE_PROMPT, DEMO_SCRIPT, Error, GlobalVars, Key, Stage, TypewriterConfig, VarStore,
    parse_str,
};

const IDLE_LIMIT: usize = 1000;

fn stage_for(script: &str) -> Stage {
    let script = parse_str(script).expect("Failed to parse script");
    let mut stage = Stage::new();
    stage
        .start_boxed(
            script
                .into_message(TypewriterConfig::default())
                .expect("Failed to build message"),
        )
        .expect("Failed to start script");
    stage
}

fn settle(stage: &mut Stage) {
    stage
        .run_until_idle(IDLE_LIMIT)
        .expect("Timers did not go idle");
}

fn var<'a>(vars: &'a GlobalVars, name: &str) -> &'a str {
    vars.get(name).expect("Variable should be set")
}

#[test]
fn test_demo_dialogue_end_to_end() {
    let mut stage = stage_for(DEMO_SCRIPT);

    settle(&mut stage);
    assert_eq!(stage.render(), vec!["Welcome", CONTINUE_PROMPT]);

    // Auto-advancing part runs straight into the instant one.
    stage.press(Key::ADVANCE).unwrap();
    settle(&mut stage);
    assert_eq!(
        stage.render(),
        vec![
            "Welcome",
            "No time to explain",
            "This one doesn't get typed",
            CONTINUE_PROMPT
        ]
    );

    // The question waits for input instead of showing the prompt.
    stage.press(Key::ADVANCE).unwrap();
    settle(&mut stage);
    assert!(!stage.render().contains(&CONTINUE_PROMPT.to_owned()));
    stage.type_str("Ada").unwrap();
    assert!(stage.press(Key::CONFIRM).unwrap());
    assert_eq!(var(stage.vars(), "name"), "Ada");

    settle(&mut stage);
    let lines = stage.render();
    assert_eq!(lines[lines.len() - 2], "Hello Ada");
    assert_eq!(lines[lines.len() - 1], CONTINUE_PROMPT);
    assert_eq!(stage.log().len(), 1);

    // Completing the first message brings in the next one, which
    // auto-advances into the choice.
    stage.press(Key::ADVANCE).unwrap();
    settle(&mut stage);
    assert_eq!(stage.log().len(), 3);
    assert!(stage.log().is_interactive(2));

    assert!(stage.press(Key::Down).unwrap());
    assert!(stage.press(Key::ADVANCE).unwrap());
    assert_eq!(var(stage.vars(), "selected"), "2");
    assert_eq!(stage.log().len(), 4);

    settle(&mut stage);
    stage.press(Key::ADVANCE).unwrap();
    settle(&mut stage);

    assert_eq!(stage.log().len(), 5);
    assert_eq!(stage.pending_timers(), 0);
    let lines = stage.render();
    assert!(lines.contains(&"Selected option 2".to_owned()));
    assert!(lines.contains(&"  [ 2 ]".to_owned()));
    assert_eq!(&lines[lines.len() - 2..], ["End of demo", "Goodbye Ada"]);

    // Nothing is left to react to keys.
    assert!(!stage.press(Key::ADVANCE).unwrap());
    assert!(!stage.press(Key::Char('q')).unwrap());
}

#[test]
fn test_local_capture_feeds_interpolation() {
    let mut stage = stage_for(
        r#"
ask "Pick: " pick 0ms
say " -> {pick}" 0ms auto
"#,
    );

    stage.type_str("42").unwrap();
    stage.press(Key::CONFIRM).unwrap();

    assert_eq!(stage.render(), vec!["Pick: 42 -> 42"]);
    assert!(stage.vars().is_empty());
}

#[test]
fn test_discarded_input_leaves_no_trace() {
    let mut stage = stage_for(
        r#"
ask "Secret: " secret global discard 0ms
say "ok" 0ms auto
"#,
    );

    stage.type_str("hunter2").unwrap();
    stage.press(Key::CONFIRM).unwrap();

    assert_eq!(stage.render(), vec!["Secret: ok"]);
    assert_eq!(var(stage.vars(), "secret"), "hunter2");
}

#[test]
fn test_missing_variable_surfaces_as_error() {
    let script = parse_str("say \"Hi {who}\" 0ms").unwrap();
    let mut stage = Stage::new();

    let err = stage
        .start_boxed(script.into_message(TypewriterConfig::default()).unwrap())
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::MissingVariable("who".into()))
    );
}

#[test]
fn test_preset_global_is_interpolated() {
    let script = parse_str("say \"Hi {who}\" 0ms auto").unwrap();
    let mut stage = Stage::new();
    stage.vars_mut().set("who", "there".into());

    stage
        .start_boxed(script.into_message(TypewriterConfig::default()).unwrap())
        .unwrap();

    assert_eq!(stage.render(), vec!["Hi there"]);
}

#[test]
fn test_advance_skips_a_slow_reveal() {
    let mut stage = stage_for("say \"a very slow line\" 10s");

    assert_eq!(stage.pending_timers(), 1);
    assert!(stage.press(Key::ADVANCE).unwrap());

    assert_eq!(stage.pending_timers(), 0);
    assert_eq!(stage.render(), vec!["a very slow line", CONTINUE_PROMPT]);
}

#[test]
fn test_enormous_delay_still_runs() {
    let mut stage = stage_for("say \"x\" 10000000000000000000s");

    assert_eq!(stage.pending_timers(), 1);
    assert!(stage.next_deadline().is_some());
    assert!(stage.press(Key::ADVANCE).unwrap());
    assert_eq!(stage.render(), vec!["x", CONTINUE_PROMPT]);
}

#[test]
fn test_script_errors() {
    let err = parse_str("shout \"hi\"").unwrap_err();
    assert!(format!("{:#}", err).contains("Unknown directive: shout"));

    let err = parse_str("# only a comment\n").unwrap_err();
    assert!(err.to_string().contains("no messages"));
}
