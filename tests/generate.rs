use erdflow::layout::{GRID_COLUMNS, Layout, LayoutError, LayoutMode, RankDirection};
use erdflow::parser::{ParseOptions, TypeSuffix, parse};
use erdflow::{generate, generate_with};
use pretty_assertions::assert_eq;

const BLOG: &str = r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

model User {
  id    Int    @id @default(autoincrement())
  email String @unique
  posts Post[]
}

model Post {
  id       Int    @id
  // who wrote it
  author   User   @relation(fields: [authorId], references: [id])
  authorId Int
}
"#;

fn ids(layout: &Layout) -> Vec<&str> {
    layout.nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn test_blog_schema() {
    let layout = generate(BLOG, "flowchart", 100).unwrap();

    assert_eq!(ids(&layout), vec!["User", "Post"]);
    assert_eq!(layout.edges.len(), 1);

    let edge = &layout.edges[0];
    assert_eq!(edge.id, "e-0");
    assert_eq!(edge.source, "Post");
    assert_eq!(edge.target, "User");
    assert_eq!(edge.label, "author");
    assert!(!edge.self_ref);

    let post = layout.node("Post").unwrap();
    assert_eq!(post.data.fields.len(), 3);
    assert_eq!(post.data.fields[1], "author   User   @relation(fields: [authorId], references: [id])");
}

#[test]
fn test_blog_schema_with_modifiers_stripped() {
    let options = ParseOptions {
        type_suffix: TypeSuffix::StripModifiers,
        forward_references: true,
    };
    let layout = generate_with(BLOG, LayoutMode::Grid, 100, RankDirection::default(), options);

    let pairs: Vec<_> = layout
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(pairs, vec![("User", "Post", "posts"), ("Post", "User", "author")]);
}

#[test]
fn test_empty_input() {
    for text in ["", "   \n\t", "enum Role { USER ADMIN }", "not a schema at all"] {
        for mode in ["grid", "hierarchical"] {
            let layout = generate(text, mode, 100).unwrap();
            assert_eq!(layout, Layout::default());
        }
    }
}

#[test]
fn test_unknown_mode() {
    assert_eq!(
        generate(BLOG, "circular", 100),
        Err(LayoutError::UnknownMode("circular".into()))
    );
}

#[test]
fn test_deterministic() {
    for mode in ["grid", "traditional"] {
        let first = generate(BLOG, mode, 120).unwrap();
        let second = generate(BLOG, mode, 120).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_parse_is_idempotent() {
    assert_eq!(parse(BLOG), parse(BLOG));
}

#[test]
fn test_grid_formula() {
    let source: String = (0..12)
        .map(|i| format!("model M{i} {{\n  id Int\n}}\n"))
        .collect();
    let spacing = 150;
    let layout = generate(&source, "grid", spacing).unwrap();

    assert_eq!(layout.nodes.len(), 12);
    for (i, node) in layout.nodes.iter().enumerate() {
        assert_eq!(node.id, format!("M{i}"));
        assert_eq!(node.position.x, ((i % GRID_COLUMNS) as i64 * spacing) as f64);
        assert_eq!(node.position.y, ((i / GRID_COLUMNS) as i64 * spacing) as f64);
    }
}

#[test]
fn test_spacing_is_clamped() {
    let source = "model A { id Int }\nmodel B { id Int }";
    let clamped = generate(source, "grid", -25).unwrap();
    assert_eq!(clamped, generate(source, "grid", 1).unwrap());
    assert_eq!(clamped.nodes[1].position.x, 1.0);

    let zero = generate(source, "hierarchical", 0).unwrap();
    assert_eq!(zero, generate(source, "hierarchical", 1).unwrap());
}

#[test]
fn test_acyclic_layers_follow_edges() {
    let source = r#"
model A { id Int }
model B { a A }
model C {
  a A
  b B
}
model D { c C }
"#;
    let layout = generate(source, "hierarchical", 80).unwrap();
    assert_eq!(layout.edges.len(), 4);

    for edge in &layout.edges {
        let source = layout.node(&edge.source).unwrap();
        let target = layout.node(&edge.target).unwrap();
        assert!(source.rank < target.rank, "{} -> {}", edge.source, edge.target);
        assert!(source.position.y + source.height < target.position.y);
    }

    let ranks: Vec<_> = ["D", "C", "B", "A"]
        .iter()
        .map(|id| layout.node(id).unwrap().rank)
        .collect();
    assert_eq!(ranks, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn test_cyclic_graph_completes() {
    let source = "model A { b B }\nmodel B { c C }\nmodel C {\n a A\n c C\n}";
    let options = ParseOptions {
        forward_references: true,
        ..Default::default()
    };

    for direction in [RankDirection::TopBottom, RankDirection::LeftRight] {
        let layout = generate_with(source, LayoutMode::Hierarchical, 100, direction, options);
        assert_eq!(ids(&layout), vec!["A", "B", "C"]);
        assert_eq!(layout.edges.len(), 4);
        assert!(layout.edges[3].self_ref);
        for edge in &layout.edges {
            assert!(edge.waypoints.len() >= 2);
            assert!(edge.waypoints.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }
}

#[test]
fn test_isolated_models_are_kept() {
    let source = "model User { id Int }\nmodel Post { author User }\nmodel Audit { at DateTime }";
    let layout = generate(source, "hierarchical", 100).unwrap();
    assert_eq!(ids(&layout), vec!["User", "Post", "Audit"]);
    assert_eq!(layout.node("Audit").unwrap().rank, Some(2));
}

#[test]
fn test_json_shape() {
    let layout = generate(BLOG, "grid", 100).unwrap();
    let value = serde_json::to_value(&layout).unwrap();

    let node = &value["nodes"][0];
    assert_eq!(node["id"], "User");
    assert_eq!(node["position"]["x"], 0.0);
    assert_eq!(node["position"]["y"], 0.0);
    assert_eq!(node["data"]["label"], "User");
    assert!(node.get("rank").is_none());

    let edge = &value["edges"][0];
    assert_eq!(edge["id"], "e-0");
    assert!(edge["sourceSide"].is_string());
    assert!(edge["targetSide"].is_string());
    assert_eq!(edge["selfRef"], false);
    assert!(edge["waypoints"].is_array());
}
