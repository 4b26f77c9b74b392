use crate::config::Config;
use crate::layout::{Layout, LineKind};
use anyhow::Result;
use std::path::Path;

/// Draw a computed layout as SVG. This is a pure consumer: it reads the
/// positions and geometry and nothing else, so any other presentation layer
/// can replace it.
pub fn render_svg(layout: &Layout, config: &Config) -> String {
    let theme = &config.theme;
    let render = &config.render;
    let card_w = config.layout.card.width;
    let card_h = config.layout.card.height;

    let pad = render.padding;
    let width = layout.width.max(1.0) + pad * 2.0;
    let height = layout.height.max(1.0) + pad * 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        -pad, -pad
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        -pad, -pad, theme.background
    ));

    for line in &layout.lines {
        let stroke = match line.kind {
            LineKind::Partnership => theme.partnership_color.as_str(),
            LineKind::Stem | LineKind::Branch => theme.line_color.as_str(),
        };
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
            line.x1, line.y1, line.x2, line.y2, stroke
        ));
    }

    for node in layout.nodes.values() {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.0}\" ry=\"{:.0}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            node.x,
            node.y,
            card_w,
            card_h,
            render.corner_radius,
            render.corner_radius,
            theme.card_fill,
            theme.card_border
        ));
        let center_x = node.x + card_w / 2.0;
        let center_y = node.y + card_h / 2.0;
        svg.push_str(&format!(
            "<text x=\"{center_x:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.card_text_color,
            escape_xml(&node.display_name)
        ));
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Graph, RelationKind};
    use crate::layout::{LayoutMode, compute_layout};

    #[test]
    fn render_svg_basic() {
        let mut graph = Graph::new();
        graph.ensure_person("a", Some("Alex Pioneer".to_string()));
        graph.ensure_person("b", Some("Brianna Pioneer".to_string()));
        graph.ensure_person("c", Some("Child A".to_string()));
        graph.add_relationship("a", "c", RelationKind::ParentChild);
        graph.add_relationship("b", "c", RelationKind::ParentChild);

        let config = Config::default();
        let layout = compute_layout(&graph, LayoutMode::Vertical, &config.layout);
        let svg = render_svg(&layout, &config);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Alex Pioneer"));
        assert!(svg.contains("</svg>"));
        // partnership tie + stem + drop
        assert_eq!(svg.matches("<line").count(), 3);
    }

    #[test]
    fn escapes_names() {
        let mut graph = Graph::new();
        graph.ensure_person("a", Some("Mary <Molly> O'Neil".to_string()));
        let config = Config::default();
        let layout = compute_layout(&graph, LayoutMode::Vertical, &config.layout);
        let svg = render_svg(&layout, &config);
        assert!(svg.contains("Mary &lt;Molly&gt; O&apos;Neil"));
    }
}
