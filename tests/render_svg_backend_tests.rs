mod support;

use iterplot::PlotError;
use iterplot::core::Viewport;
use iterplot::render::{
    Color, LinePrimitive, LineStrokeStyle, OutputFormat, RectPrimitive, RenderFrame, Renderer,
    SvgRenderer, TextHAlign, TextPrimitive, render_to_file,
};

fn sample_frame() -> RenderFrame {
    RenderFrame::new(Viewport::new(320, 200))
        .with_rect(
            RectPrimitive::new(10.0, 10.0, 300.0, 180.0, Color::rgb(1.0, 1.0, 1.0))
                .with_border(1.0, Color::rgb(0.3, 0.3, 0.3)),
        )
        .with_line(LinePrimitive::new(
            20.0,
            150.0,
            300.0,
            40.0,
            1.5,
            Color::from_rgb8(31, 119, 180),
        ))
        .with_line(
            LinePrimitive::new(160.0, 10.0, 160.0, 190.0, 1.0, Color::rgb(0.5, 0.5, 0.5))
                .with_stroke_style(LineStrokeStyle::Dashed),
        )
        .with_text(TextPrimitive::new(
            "costs",
            160.0,
            12.0,
            14.0,
            Color::rgb(0.1, 0.1, 0.1),
            TextHAlign::Center,
        ))
}

#[test]
fn svg_renderer_writes_complete_document() {
    let dir = support::scratch_dir("svg-document");
    let path = dir.join("frame.svg");
    let mut renderer = SvgRenderer::new(&path);

    renderer.render(&sample_frame()).expect("render");

    let svg = std::fs::read_to_string(&path).expect("svg");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("costs"));
    let stats = renderer.last_stats();
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.texts_drawn, 1);
    assert_eq!(stats.lines_drawn, 2);
}

#[test]
fn svg_renderer_rejects_invalid_frames_without_writing() {
    let dir = support::scratch_dir("svg-invalid");
    let path = dir.join("invalid.svg");
    let frame = RenderFrame::new(Viewport::new(320, 200)).with_line(LinePrimitive::new(
        0.0,
        f64::NAN,
        10.0,
        10.0,
        1.0,
        Color::rgb(0.0, 0.0, 0.0),
    ));

    let err = SvgRenderer::new(&path).render(&frame).expect_err("invalid");

    assert!(matches!(err, PlotError::InvalidData(_)));
    assert!(!path.exists());
}

#[test]
fn render_to_file_fails_for_missing_directory() {
    let dir = support::scratch_dir("svg-missing-dir");
    let path = dir.join("absent").join("frame.svg");

    let result = render_to_file(OutputFormat::Svg, &sample_frame(), &path);

    assert!(result.is_err());
}

#[test]
fn output_format_parses_case_insensitively() {
    assert_eq!("SVG".parse::<OutputFormat>().expect("svg"), OutputFormat::Svg);
    assert_eq!("png".parse::<OutputFormat>().expect("png"), OutputFormat::Png);
    assert!(matches!(
        "pdf".parse::<OutputFormat>(),
        Err(PlotError::InvalidConfig(_))
    ));
    assert_eq!(OutputFormat::Png.extension(), "png");
}

#[cfg(not(feature = "cairo-backend"))]
#[test]
fn png_output_needs_cairo_backend() {
    let dir = support::scratch_dir("svg-png-unavailable");
    let err = render_to_file(OutputFormat::Png, &sample_frame(), &dir.join("frame.png"))
        .expect_err("png unavailable");
    assert!(matches!(err, PlotError::InvalidConfig(_)));
}
