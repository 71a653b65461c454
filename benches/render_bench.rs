use criterion::{black_box, criterion_group, criterion_main, Criterion};
use promptline::config::{Config, Segment};
use promptline::env::MockEnv;
use promptline::render::PromptRenderer;
use promptline::segments::SegmentType;
use promptline::template::collect_needs;
use serde_json::json;
use std::sync::Arc;

fn bench_env() -> Arc<MockEnv> {
    Arc::new(
        MockEnv::new()
            .with_cwd("/home/bench/work/app")
            .with_home("/home/bench")
            .with_var("AWS_PROFILE", "production")
            .with_var("USER", "bench")
            .with_status(1),
    )
}

fn bench_config() -> Config {
    let mut path = Segment::new(SegmentType::Path);
    path.style = "powerline".to_string();
    path.powerline_symbol = "\u{e0b0}".to_string();
    path.foreground = "#e2e8f0".into();
    path.background = "#2d3748".into();

    let mut aws = Segment::new(SegmentType::Aws);
    aws.foreground = "#1a202c".into();
    aws.background = "#d69e2e".into();
    aws.foreground_templates = Some(vec![
        "{{#if (contains \"production\" profile)}}#ff0000{{/if}}".to_string(),
    ]);

    let mut status = Segment::new(SegmentType::Text);
    status.template = "{{#if segments.exit.code}}!{{ segments.exit.code }}{{/if}}".to_string();
    status.properties.insert("text", json!(""));

    let exit = Segment::new(SegmentType::Exit);

    Config {
        final_space: true,
        segments: vec![path, aws, status, exit],
    }
}

fn bench_render_line(c: &mut Criterion) {
    std::env::set_var("NO_COLOR", "1");
    let renderer = PromptRenderer::new(bench_env());

    c.bench_function("render_prompt_line", |b| {
        b.iter(|| {
            let mut config = bench_config();
            black_box(renderer.render(&mut config).unwrap())
        })
    });

    std::env::remove_var("NO_COLOR");
}

fn bench_render_line_with_colors(c: &mut Criterion) {
    std::env::set_var("TERM", "xterm-256color");
    std::env::remove_var("NO_COLOR");
    let renderer = PromptRenderer::new(bench_env());

    c.bench_function("render_prompt_line_colored", |b| {
        b.iter(|| {
            let mut config = bench_config();
            black_box(renderer.render(&mut config).unwrap())
        })
    });
}

fn bench_needs_scan(c: &mut Criterion) {
    let template = "{{ segments.git.branch }} on {{ segments.os.name }} \
                    {{#if segments.exit.code}}failed{{/if}}";
    let foreground = vec!["{{#if segments.git.detached}}#d69e2e{{/if}}".to_string()];
    let background: Vec<String> = Vec::new();

    c.bench_function("collect_needs", |b| {
        b.iter(|| black_box(collect_needs(template, &foreground, &background)))
    });
}

criterion_group!(
    benches,
    bench_render_line,
    bench_render_line_with_colors,
    bench_needs_scan
);
criterion_main!(benches);
