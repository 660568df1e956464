use std::path::{Path, PathBuf};

use rstest::rstest;
use wbs_layout::layout::{GraphState, Layout, PathSegment};
use wbs_layout::{
    Config, LayoutConfig, LayoutEngine, StructuralError, WbsDocument, WbsNode, compute_layout,
    layout_tree, parse_input, render_with_config,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture read failed")
}

fn layout_fixture(name: &str, config: &LayoutConfig) -> Layout {
    let parsed = parse_input(&read_fixture(name)).expect("parse failed");
    compute_layout(&parsed.nodes, config).expect("layout failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["sample.wbs", "sample.json", "project.wbs", "project.json5"];
    for engine in [LayoutEngine::Subtree, LayoutEngine::Graph] {
        let mut config = Config::default();
        config.layout.engine = engine;
        for name in candidates {
            let svg = render_with_config(&read_fixture(name), &config)
                .unwrap_or_else(|err| panic!("{name} ({engine:?}): {err}"));
            assert_valid_svg(&svg, name);
        }
    }
}

#[test]
fn outline_and_node_list_produce_identical_layouts() {
    let config = LayoutConfig::default();
    assert_eq!(
        layout_fixture("sample.wbs", &config),
        layout_fixture("sample.json", &config)
    );
}

#[test]
fn sample_tree_geometry() {
    let layout = layout_fixture("sample.wbs", &LayoutConfig::default());

    let root = layout.node("Root").unwrap();
    assert_eq!((root.x, root.y), (165.0, 0.0));
    assert_eq!(root.subtree.unwrap().width, 430.0);

    let one = layout.node("1").unwrap();
    assert_eq!((one.x, one.y), (55.0, 80.0));
    assert_eq!(one.subtree.unwrap().width, 210.0);

    let deepest = layout.node("1.2.1").unwrap();
    assert_eq!(deepest.depth, 3);
    assert_eq!(deepest.y, 240.0);

    assert_eq!(layout.width, 430.0);
    assert_eq!(layout.height, 280.0);
}

#[test]
fn single_node_occupies_one_box() {
    let layout = layout_tree(&[WbsNode::root("only", "Only")], &LayoutConfig::default()).unwrap();
    assert_eq!(layout.width, 100.0);
    assert_eq!(layout.height, 40.0);
    assert!(layout.edges.is_empty());
}

#[rstest]
#[case::defaults(100.0, 10.0)]
#[case::narrow_tight(60.0, 0.0)]
#[case::wide_loose(140.0, 25.0)]
fn subtree_width_is_sum_of_children_plus_gaps(#[case] node_width: f32, #[case] sibling_gap: f32) {
    let config = LayoutConfig {
        node_width,
        sibling_gap,
        ..LayoutConfig::default()
    };
    let layout = layout_fixture("sample.wbs", &config);

    for node in layout.ordered_nodes() {
        let children: Vec<_> = layout
            .ordered_nodes()
            .filter(|other| layout.edges.iter().any(|e| e.from == node.id && e.to == other.id))
            .collect();
        let span = node.subtree.unwrap();
        if children.is_empty() {
            assert_eq!(span.width, node_width, "{}", node.id);
            continue;
        }
        let expected: f32 = children.iter().map(|c| c.subtree.unwrap().width).sum::<f32>()
            + (children.len() - 1) as f32 * sibling_gap;
        assert_eq!(span.width, expected, "{}", node.id);

        // Adjacent sibling spans sit exactly one gap apart.
        for pair in children.windows(2) {
            let left = pair[0].subtree.unwrap();
            let right = pair[1].subtree.unwrap();
            assert!((left.end() + sibling_gap - right.x).abs() < 1e-3);
        }
    }
}

#[test]
fn every_box_is_centered_over_its_subtree() {
    let layout = layout_fixture("project.wbs", &LayoutConfig::default());
    for node in layout.ordered_nodes() {
        let span = node.subtree.unwrap();
        assert!((node.center_x() - span.center()).abs() < 1e-3, "{}", node.id);
    }
}

#[test]
fn layout_is_deterministic() {
    let config = LayoutConfig::default();
    let first = layout_fixture("project.wbs", &config);
    let second = layout_fixture("project.wbs", &config);
    assert_eq!(first, second);
}

#[test]
fn vertically_aligned_edges_are_straight() {
    let layout = layout_fixture("sample.wbs", &LayoutConfig::default());
    let edge = layout.edges.iter().find(|e| e.to == "1.2.1").unwrap();
    assert_eq!(edge.start.x, edge.end.x);
    assert!(edge.path.curves().next().is_none());
    assert_eq!(edge.path.polyline().len(), 2);
}

#[test]
fn small_offsets_use_a_single_bezier() {
    let config = LayoutConfig {
        node_width: 10.0,
        ..LayoutConfig::default()
    };
    let nodes = vec![
        WbsNode::root("r", "R"),
        WbsNode::child("a", "A", "r"),
        WbsNode::child("b", "B", "r"),
    ];
    let layout = layout_tree(&nodes, &config).unwrap();
    for edge in &layout.edges {
        let curves: Vec<_> = edge.path.curves().collect();
        assert_eq!(curves.len(), 1, "{}", edge.id);
        assert!(matches!(curves[0], PathSegment::CubicTo { .. }));
    }
}

#[test]
fn large_offsets_use_two_opposite_arcs() {
    let layout = layout_fixture("sample.wbs", &LayoutConfig::default());
    let edge = layout.edges.iter().find(|e| e.from == "Root" && e.to == "3").unwrap();
    let sweeps: Vec<bool> = edge
        .path
        .curves()
        .filter_map(|segment| match segment {
            PathSegment::ArcTo { clockwise, .. } => Some(*clockwise),
            _ => None,
        })
        .collect();
    // Child to the right: first turn counter-clockwise, second clockwise.
    assert_eq!(sweeps, vec![false, true]);
    assert_eq!(edge.path.end(), Some(edge.end));
}

#[test]
fn adding_a_child_widens_only_the_affected_branch() {
    let config = LayoutConfig::default();
    let parsed = parse_input(&read_fixture("sample.wbs")).unwrap();
    let before = compute_layout(&parsed.nodes, &config).unwrap();

    let mut document = WbsDocument::new(parsed.nodes);
    let id = document.add_child("1", None).unwrap();
    let after = compute_layout(&document.nodes, &config).unwrap();

    let added = after.node(&id).unwrap();
    assert_eq!(added.label, "New Node");
    assert_eq!(added.depth, 2);

    assert_eq!(after.node("1").unwrap().subtree.unwrap().width, 320.0);
    assert_eq!(after.node("2").unwrap().x - before.node("2").unwrap().x, 110.0);
    assert_eq!(after.node("3").unwrap().x - before.node("3").unwrap().x, 110.0);

    // Existing children of "1" keep their offsets inside its span.
    for existing in ["1.1", "1.2", "1.2.1"] {
        let offset = |layout: &Layout| {
            layout.node(existing).unwrap().x - layout.node("1").unwrap().subtree.unwrap().x
        };
        assert_eq!(offset(&after), offset(&before), "{existing}");
    }
    // The new node is placed after its existing siblings.
    assert!(added.x > after.node("1.2").unwrap().x);
}

#[test]
fn adding_under_unknown_parent_fails() {
    let parsed = parse_input(&read_fixture("sample.json")).unwrap();
    let mut document = WbsDocument::new(parsed.nodes);
    let err = document.add_child("ghost", None).unwrap_err();
    assert_eq!(err.reason(), "dangling-parent");
    assert_eq!(document.nodes.len(), 7);
}

#[test]
fn graph_state_add_node_relayouts() {
    let config = LayoutConfig::default();
    let parsed = parse_input(&read_fixture("project.json5")).unwrap();
    let mut state = GraphState::new(parsed.nodes, &config).unwrap();
    let id = state.add_node("b", Some("Infra"), &config).unwrap();

    assert_eq!(state.nodes().len(), 5);
    assert_eq!(state.edges().len(), 4);
    let parent = state.layout().node("b").unwrap();
    let child = state.layout().node(&id).unwrap();
    assert!(child.y >= parent.y + parent.height);
    assert_eq!(child.label, "Infra");

    let snapshot = state.layout().clone();
    assert!(state.add_node("missing", None, &config).is_err());
    assert_eq!(state.layout(), &snapshot);
    assert_eq!(state.nodes().len(), 5);
}

#[rstest]
#[case::empty("invalid/empty.json", "no-root")]
#[case::multiple_roots("invalid/multiple_roots.json", "multiple-roots")]
#[case::dangling("invalid/dangling.json", "dangling-parent")]
#[case::duplicate("invalid/duplicate.json", "duplicate-id")]
#[case::cycle("invalid/cycle.json", "unreachable")]
fn invalid_inputs_report_stable_reasons(
    #[case] fixture: &str,
    #[case] expected: &str,
    #[values(LayoutEngine::Subtree, LayoutEngine::Graph)] engine: LayoutEngine,
) {
    let mut config = Config::default();
    config.layout.engine = engine;
    let err = render_with_config(&read_fixture(fixture), &config).unwrap_err();
    let structural = err
        .downcast_ref::<StructuralError>()
        .unwrap_or_else(|| panic!("{fixture}: not a structural error: {err}"));
    assert_eq!(structural.reason(), expected);
}
