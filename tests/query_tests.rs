use twin_parser::{hover, suggest, ClassParser, NodeKind, ParserConfig, Token};

fn names<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
    tokens.iter().map(|t| t.text).collect()
}

#[test]
fn test_hover_on_separator_resolves_to_variant() {
    let text = "lg:hover:(bg-red-500)";
    let result = hover(text, 8).unwrap();
    assert_eq!(result.kind, NodeKind::Variant);
    assert_eq!(result.target.text, "hover");
    assert_eq!(names(&result.variants), vec!["lg"]);
}

#[test]
fn test_hover_leaf_resolves_variant_stack_and_importance() {
    let text = "md:dark:!(hover:(text-gray-500 bg-white))";
    let position = text.find("bg-white").unwrap() + 2;
    let result = hover(text, position).unwrap();
    assert_eq!(result.kind, NodeKind::ClassName);
    assert_eq!(result.target.text, "bg-white");
    assert_eq!(names(&result.variants), vec!["md", "dark", "hover"]);
    assert!(result.important);
}

#[test]
fn test_hover_after_group_close_leaves_the_group() {
    let text = "(a!) b";
    // one past `)` is the space between items
    assert!(hover(text, 4).is_none());
    let result = hover(text, 5).unwrap();
    assert_eq!(result.target.text, "b");
    assert!(!result.important);
}

#[test]
fn test_hover_arbitrary_variant() {
    let result = hover("[&:nth-child(3)]:underline", 3).unwrap();
    assert_eq!(result.kind, NodeKind::ArbitraryVariant);
    assert_eq!(result.target.text, "[&:nth-child(3)]");
}

#[test]
fn test_hover_arbitrary_style_value() {
    let text = "hover:bg-[#123456]/50";
    let result = hover(text, 12).unwrap();
    assert_eq!(result.kind, NodeKind::ArbitraryStyle);
    assert_eq!(result.prop.map(|t| t.text), Some("bg-"));
    assert_eq!(result.value.map(|t| t.text), Some("#123456"));
    assert_eq!(names(&result.variants), vec!["hover"]);
}

#[test]
fn test_suggest_empty_input() {
    let result = suggest("", 0);
    assert!(result.target.is_none());
    assert!(result.variants.is_empty());
    assert!(!result.in_comment);
}

#[test]
fn test_suggest_position_zero() {
    let result = suggest("md:flex p-2", 0);
    assert!(result.target.is_none());
    assert!(result.variants.is_empty());
    assert!(!result.in_comment);
}

#[test]
fn test_suggest_inside_comment() {
    let text = "a /* hover: */ b";
    for position in 5..12 {
        let result = suggest(text, position);
        assert!(result.in_comment, "position {}", position);
        assert!(result.variants.is_empty());
    }
}

#[test]
fn test_suggest_after_open_paren() {
    let text = "lg:(";
    let result = suggest(text, 4);
    assert!(result.target.is_none());
    assert_eq!(names(&result.variants), vec!["lg"]);
}

#[test]
fn test_suggest_between_items_in_group() {
    let text = "lg:(a  b)";
    let result = suggest(text, 6);
    assert!(result.target.is_none());
    assert_eq!(names(&result.variants), vec!["lg"]);
}

#[test]
fn test_suggest_end_of_partial_class() {
    let text = "md:dark:(hover:te";
    let result = suggest(text, text.len());
    assert_eq!(result.target.map(|t| t.text), Some("te"));
    assert_eq!(result.word.map(|t| t.text), Some("te"));
    assert_eq!(result.kind, Some(NodeKind::ClassName));
    assert_eq!(names(&result.variants), vec!["md", "dark", "hover"]);
}

#[test]
fn test_suggest_inside_css_value_string() {
    let text = "content-[\"hi there\"]";
    let result = suggest(text, 12);
    assert!(result.in_string);
    assert!(!result.in_comment);
}

#[test]
fn test_suggest_with_custom_separator() {
    let parser = ClassParser::new(&ParserConfig::with_separator("_")).unwrap();
    let result = parser.suggest("lg_hover_", 9);
    assert!(result.target.is_none());
    assert_eq!(names(&result.variants), vec!["lg", "hover"]);
}

#[test]
fn test_suggest_serializes_camel_case() {
    let json = serde_json::to_value(suggest("a /* b", 6)).unwrap();
    assert_eq!(json["inComment"], true);
    assert_eq!(json["inString"], false);
    assert!(json.get("target").is_none());
}
