use promptline::config::Segment;
use promptline::env::{matches_any_pattern, MockEnv, OsKind};
use promptline::segments::*;
use promptline::template::{RenderState, TemplateEngine};
use serde_json::json;
use std::sync::Arc;

fn bound(kind: SegmentType, env: MockEnv) -> Segment {
    let registry = WriterRegistry::with_defaults();
    let mut segment = Segment::new(kind);
    segment.map_with_writer(&registry, Arc::new(env)).unwrap();
    segment
}

#[test]
fn test_registry_binds_known_writer() {
    let registry = WriterRegistry::with_defaults();
    let writer = registry
        .bind(&SegmentType::Git, Arc::new(MockEnv::new()))
        .unwrap();
    assert_eq!(writer.name(), "git");
}

#[test]
fn test_registry_rejects_unknown_type() {
    let registry = WriterRegistry::with_defaults();
    let kind = SegmentType::from("sparkle");
    assert!(!registry.is_registered(&kind));

    let err = registry.bind(&kind, Arc::new(MockEnv::new())).unwrap_err();
    assert!(matches!(err, RegistryError::UnknownSegmentType(ref tag) if tag == "sparkle"));
    assert_eq!(err.to_string(), "unknown segment type: sparkle");

    // A failed bind leaves the segment writerless.
    let mut segment = Segment::new(SegmentType::from("sparkle"));
    assert!(segment
        .map_with_writer(&registry, Arc::new(MockEnv::new()))
        .is_err());
    assert!(segment.writer().is_none());
}

#[test]
fn test_registry_registration_replaces() {
    let mut registry = WriterRegistry::with_defaults();
    registry.register(SegmentType::Text, |env| Box::new(TimeWriter::new(env)));

    let writer = registry
        .bind(&SegmentType::Text, Arc::new(MockEnv::new()))
        .unwrap();
    assert_eq!(writer.name(), "time");
}

#[test]
fn test_segment_type_tags_round_trip() {
    for tag in ["aws", "exit", "git", "os", "path", "session", "text", "time"] {
        let kind = SegmentType::from(tag);
        assert!(!matches!(kind, SegmentType::Unknown(_)), "tag {}", tag);
        assert_eq!(kind.tag(), tag);
    }
    assert_eq!(SegmentType::from("nope").tag(), "nope");
}

#[test]
fn test_folder_scope_no_lists_is_active() {
    let segment = bound(SegmentType::Text, MockEnv::new());
    assert!(segment.should_include_folder());

    // Even before binding there is nothing to restrict on.
    let unbound = Segment::new(SegmentType::Text);
    assert!(unbound.should_include_folder());
}

#[test]
fn test_folder_scope_decision_table() {
    // (include matches, exclude matches) -> active
    let cases = [
        (true, false, true),
        (true, true, false),
        (false, false, false),
        (false, true, false),
    ];

    for (include_match, exclude_match, expected) in cases {
        let env = MockEnv::new()
            .with_cwd("/work/app")
            .with_dir_match(&["/work/*"], include_match)
            .with_dir_match(&["/work/secret/*"], exclude_match);

        let mut segment = bound(SegmentType::Text, env);
        segment.include_folders = vec!["/work/*".to_string()];
        segment.exclude_folders = vec!["/work/secret/*".to_string()];

        assert_eq!(
            segment.should_include_folder(),
            expected,
            "include_match={} exclude_match={}",
            include_match,
            exclude_match
        );
    }
}

#[test]
fn test_folder_scope_include_only() {
    let env = MockEnv::new()
        .with_cwd("/work/app")
        .with_dir_match(&["/work/*"], true);
    let mut segment = bound(SegmentType::Text, env);
    segment.include_folders = vec!["/work/*".to_string()];
    assert!(segment.should_include_folder());

    let env = MockEnv::new().with_cwd("/tmp");
    let mut segment = bound(SegmentType::Text, env);
    segment.include_folders = vec!["/work/*".to_string()];
    assert!(!segment.should_include_folder());
}

#[test]
fn test_folder_scope_exclude_only() {
    // With only an exclude list there is no include match, so the segment
    // stays inactive either way; exclusion never turns a segment on.
    let env = MockEnv::new()
        .with_cwd("/work/secret/app")
        .with_dir_match(&["/work/secret/*"], true);
    let mut segment = bound(SegmentType::Text, env);
    segment.exclude_folders = vec!["/work/secret/*".to_string()];
    assert!(!segment.should_include_folder());
}

#[test]
fn test_folder_patterns_glob_and_home() {
    let home = Some("/home/kai");

    assert!(matches_any_pattern(
        "/home/kai/work/app",
        &["~/work/*".to_string()],
        home,
        true
    ));
    assert!(matches_any_pattern(
        "/home/kai",
        &["~".to_string()],
        home,
        true
    ));
    assert!(matches_any_pattern(
        "/home/kai/work/app/deep/nested",
        &["/home/kai/work/**".to_string()],
        home,
        true
    ));
    assert!(!matches_any_pattern(
        "/home/kai/other",
        &["~/work/*".to_string()],
        home,
        true
    ));
}

#[test]
fn test_folder_patterns_normalize_separators_and_case() {
    assert!(matches_any_pattern(
        "C:\\Users\\Kai\\Work",
        &["c:/users/*/work".to_string()],
        None,
        false
    ));
    assert!(!matches_any_pattern(
        "/Work/App",
        &["/work/app".to_string()],
        None,
        true
    ));
    // Trailing slashes on either side do not break literal matches.
    assert!(matches_any_pattern(
        "/work/app/",
        &["/work/app".to_string()],
        None,
        true
    ));
}

#[test]
fn test_folder_patterns_invalid_glob_never_matches() {
    assert!(!matches_any_pattern(
        "/work/app",
        &["[".to_string(), "".to_string()],
        None,
        true
    ));
}

fn aws_segment_with_profile(profile: &str) -> Segment {
    let env = MockEnv::new().with_var("AWS_PROFILE", profile);
    let mut segment = bound(SegmentType::Aws, env);
    segment.foreground = "#000000".into();
    segment.background = "#ffffff".into();
    segment.populate().unwrap();
    segment
}

#[test]
fn test_color_resolution_without_templates() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let segment = aws_segment_with_profile("john");

    let color = segment.resolve_foreground(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#000000");
    let color = segment.resolve_background(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#ffffff");
}

#[test]
fn test_color_resolution_blank_templates_fall_through() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let mut segment = aws_segment_with_profile("john");
    segment.foreground_templates = Some(vec!["".to_string(), "   ".to_string()]);

    let color = segment.resolve_foreground(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#000000");
}

#[test]
fn test_color_override_first_match_wins() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let mut segment = aws_segment_with_profile("john");
    segment.foreground_templates = Some(vec![
        "{{#if (contains \"doe\" profile)}}#001122{{/if}}".to_string(),
        "{{#if (contains \"john\" profile)}}#334455{{/if}}".to_string(),
        "#667788".to_string(),
    ]);

    let color = segment.resolve_foreground(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#334455");
}

#[test]
fn test_color_override_short_circuits_later_templates() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let mut segment = aws_segment_with_profile("john");
    // The second template does not even parse; a match on the first must
    // keep it from ever being looked at.
    segment.foreground_templates = Some(vec![
        "{{#if (contains \"john\" profile)}}#ff0000{{/if}}".to_string(),
        "{{#if broken".to_string(),
    ]);

    let color = segment.resolve_foreground(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#ff0000");
}

#[test]
fn test_color_override_falls_back_to_default() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let mut segment = aws_segment_with_profile("doe");
    segment.foreground_templates = Some(vec![
        "{{#if (contains \"john\" profile)}}#ff0000{{/if}}".to_string(),
    ]);

    let color = segment.resolve_foreground(&engine, &state).unwrap();
    assert_eq!(color.as_str(), "#000000");
}

#[test]
fn test_color_override_error_propagates() {
    let engine = TemplateEngine::new();
    let state = RenderState::new();
    let mut segment = aws_segment_with_profile("doe");
    segment.background_templates = Some(vec!["{{#if broken".to_string()]);

    assert!(segment.resolve_background(&engine, &state).is_err());
}

#[test]
fn test_needs_order_and_dedup() {
    let mut segment = Segment::new(SegmentType::Text);
    segment.template = "{{ segments.git.branch }} {{ segments.os.icon }}".to_string();
    segment.foreground_templates = Some(vec![
        "{{#if segments.git.detached}}#ff0000{{/if}}".to_string(),
    ]);
    segment.background_templates = Some(vec![
        "{{#if segments.exit.code}}#880000{{/if}}".to_string(),
    ]);

    segment.evaluate_needs();
    assert_eq!(
        segment.needs,
        vec![SegmentType::Git, SegmentType::Os, SegmentType::Exit]
    );

    // Re-evaluating an unchanged segment is idempotent.
    let first = segment.needs.clone();
    segment.evaluate_needs();
    assert_eq!(segment.needs, first);
}

#[test]
fn test_needs_empty_without_references() {
    let mut segment = Segment::new(SegmentType::Git);
    segment.template = "{{ branch }}@{{ sha }}".to_string();
    segment.evaluate_needs();
    assert!(segment.needs.is_empty());
}

#[test]
fn test_needs_recompute_replaces_previous() {
    let mut segment = Segment::new(SegmentType::Text);
    segment.template = "{{ segments.git.branch }}".to_string();
    segment.evaluate_needs();
    assert_eq!(segment.needs, vec![SegmentType::Git]);

    segment.template = "{{ segments.time.current }}".to_string();
    segment.evaluate_needs();
    assert_eq!(segment.needs, vec![SegmentType::Time]);
}

#[test]
fn test_aws_writer_reads_profile_env() {
    let env = MockEnv::new()
        .with_var("AWS_PROFILE", "staging")
        .with_var("AWS_REGION", "eu-west-1");
    let mut segment = bound(SegmentType::Aws, env);

    assert!(segment.populate().unwrap());
    let data = segment.template_data();
    assert_eq!(data["profile"], "staging");
    assert_eq!(data["region"], "eu-west-1");
}

#[test]
fn test_aws_writer_falls_back_to_default_vars() {
    let env = MockEnv::new().with_var("AWS_DEFAULT_PROFILE", "legacy");
    let mut segment = bound(SegmentType::Aws, env);

    assert!(segment.populate().unwrap());
    assert_eq!(segment.template_data()["profile"], "legacy");
}

#[test]
fn test_aws_writer_empty_without_env() {
    let mut segment = bound(SegmentType::Aws, MockEnv::new());
    assert!(!segment.populate().unwrap());
}

#[test]
fn test_exit_writer_reports_status() {
    let env = MockEnv::new().with_status(130);
    let mut segment = bound(SegmentType::Exit, env);

    assert!(segment.populate().unwrap());
    assert_eq!(segment.template_data()["code"], 130);

    let engine = TemplateEngine::new();
    let state = RenderState::new();
    assert_eq!(segment.render_text(&engine, &state).unwrap(), "\u{2718} 130");
}

#[test]
fn test_exit_writer_renders_empty_on_success() {
    let mut segment = bound(SegmentType::Exit, MockEnv::new());
    segment.populate().unwrap();

    let engine = TemplateEngine::new();
    let state = RenderState::new();
    assert_eq!(segment.render_text(&engine, &state).unwrap(), "");
}

#[test]
fn test_os_writer_icon_override_from_properties() {
    let env = MockEnv::new().with_os(OsKind::Linux);
    let mut segment = bound(SegmentType::Os, env);
    segment.properties.insert("linux", json!("L"));

    assert!(segment.populate().unwrap());
    let data = segment.template_data();
    assert_eq!(data["icon"], "L");
    assert_eq!(data["name"], "linux");
}

#[test]
fn test_path_writer_contracts_home_and_styles() {
    let env = MockEnv::new()
        .with_cwd("/home/kai/work/app")
        .with_home("/home/kai");
    let mut segment = bound(SegmentType::Path, env);

    assert!(segment.populate().unwrap());
    let data = segment.template_data();
    assert_eq!(data["full"], "~/work/app");
    assert_eq!(data["folder"], "app");
    assert_eq!(data["path"], "~/work/app");

    let env = MockEnv::new()
        .with_cwd("/home/kai/work/app")
        .with_home("/home/kai");
    let mut segment = bound(SegmentType::Path, env);
    segment.properties.insert("style", json!("folder"));
    segment.populate().unwrap();
    assert_eq!(segment.template_data()["path"], "app");
}

#[test]
fn test_session_writer_user_and_short_host() {
    let env = MockEnv::new()
        .with_var("USER", "kai")
        .with_var("HOSTNAME", "devbox.internal.example.com");
    let mut segment = bound(SegmentType::Session, env);

    assert!(segment.populate().unwrap());
    let data = segment.template_data();
    assert_eq!(data["user"], "kai");
    assert_eq!(data["host"], "devbox");

    let engine = TemplateEngine::new();
    let state = RenderState::new();
    assert_eq!(segment.render_text(&engine, &state).unwrap(), "kai@devbox");
}

#[test]
fn test_text_writer_uses_property() {
    let mut segment = bound(SegmentType::Text, MockEnv::new());
    segment.properties.insert("text", json!("release env"));

    assert!(segment.populate().unwrap());
    assert_eq!(segment.template_data()["text"], "release env");
}

#[test]
fn test_time_writer_recovers_from_bad_format() {
    let mut segment = bound(SegmentType::Time, MockEnv::new());
    segment.properties.insert("time_format", json!("%!"));

    assert!(segment.populate().unwrap());
    let current = segment.template_data()["current"].as_str().unwrap().to_string();
    // Falls back to %H:%M:%S.
    assert_eq!(current.matches(':').count(), 2);
}

#[test]
fn test_render_text_prefers_configured_template() {
    let env = MockEnv::new().with_var("AWS_PROFILE", "john");
    let mut segment = bound(SegmentType::Aws, env);
    segment.template = "aws:{{ upper profile }}".to_string();
    segment.populate().unwrap();

    let engine = TemplateEngine::new();
    let state = RenderState::new();
    assert_eq!(segment.render_text(&engine, &state).unwrap(), "aws:JOHN");
}

#[test]
fn test_render_text_error_is_distinct_from_empty() {
    let env = MockEnv::new().with_var("AWS_PROFILE", "john");
    let mut segment = bound(SegmentType::Aws, env);
    segment.template = "{{#if broken".to_string();
    segment.populate().unwrap();

    let engine = TemplateEngine::new();
    let state = RenderState::new();
    assert!(segment.render_text(&engine, &state).is_err());
}
