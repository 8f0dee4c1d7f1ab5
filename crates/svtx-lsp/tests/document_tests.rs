use super::*;

fn doc(text: &str) -> Document {
    Document::new("/src/App.svelte", text)
}

#[test]
fn test_script_region_detection() {
    let d = doc("<script>let a = 1;</script>\n<p>hi</p>\n<style>p { color: red; }</style>");
    let script = d.script_region().unwrap();
    let content = &d.text()[script.content.start as usize..script.content.end() as usize];
    assert_eq!(content, "let a = 1;");

    let style = d.style_region().unwrap();
    let content = &d.text()[style.content.start as usize..style.content.end() as usize];
    assert_eq!(content, "p { color: red; }");

    assert!(d.module_script_region().is_none());
}

#[test]
fn test_module_script_region() {
    let d = doc("<script context=\"module\">export let x;</script>\n<script>let y;</script>");
    let module = d.module_script_region().unwrap();
    assert!(d.text()[module.content.start as usize..module.content.end() as usize]
        .contains("export let x"));
    let instance = d.script_region().unwrap();
    assert!(d.text()[instance.content.start as usize..instance.content.end() as usize]
        .contains("let y"));
}

#[test]
fn test_is_in_style() {
    let d = doc("<p></p>\n<style>p {}</style>");
    assert!(d.is_in_style(Position::new(1, 8)));
    assert!(!d.is_in_style(Position::new(0, 1)));
}

#[test]
fn test_tag_at_component_and_element() {
    let d = doc("<Widget \n<div ");
    let tag = d.tag_at(Position::new(0, 8)).unwrap();
    assert_eq!(tag.name, "Widget");
    assert!(tag.is_component);
    assert_eq!(tag.attr_context, AttributeContext::Name);

    let tag = d.tag_at(Position::new(1, 5)).unwrap();
    assert_eq!(tag.name, "div");
    assert!(!tag.is_component);
}

#[test]
fn test_tag_at_closed_tag_is_content() {
    let d = doc("<div>text");
    assert!(d.tag_at(Position::new(0, 7)).is_none());
}

#[test]
fn test_attribute_value_context() {
    let d = doc("<Widget size=\"sm");
    let tag = d.tag_at(Position::new(0, 16)).unwrap();
    assert_eq!(
        tag.attr_context,
        AttributeContext::Value {
            attr_name: "size".to_string()
        }
    );

    // A closed value puts the cursor back into name context.
    let d = doc("<Widget size=\"sm\" ");
    let tag = d.tag_at(Position::new(0, 18)).unwrap();
    assert_eq!(tag.attr_context, AttributeContext::Name);
}

#[test]
fn test_word_range_stops_at_dot() {
    let d = doc("<script>obj.pro</script>");
    // Cursor at the end of `obj.pro`: the token starts after the dot.
    let span = d.word_range_at(Position::new(0, 15));
    assert_eq!(span, TextSpan::from_bounds(12, 15));
}

#[test]
fn test_word_range_includes_colon_and_dollar() {
    let d = doc("<Widget on:cl >");
    let span = d.word_range_at(Position::new(0, 13));
    let word = &d.text()[span.start as usize..span.end() as usize];
    assert_eq!(word, "on:cl");

    let d = doc("<script> $store</script>");
    let span = d.word_range_at(Position::new(0, 10));
    let word = &d.text()[span.start as usize..span.end() as usize];
    assert_eq!(word, "$store");
}

#[test]
fn test_imported_names() {
    let d = doc(
        "<script>\n\
         import Foo from './Foo.svelte';\n\
         import { a, b as c } from './util';\n\
         import type Bar from './Bar.svelte';\n\
         </script>",
    );
    let names = d.imported_names();
    assert!(names.contains("Foo"));
    assert!(names.contains("a"));
    assert!(names.contains("c"));
    assert!(names.contains("Bar"));
    assert!(!names.contains("b"));
}

#[test]
fn test_is_in_import_path() {
    let d = doc("<script>import Foo from './comp");
    assert!(d.is_in_import_path(Position::new(0, 31)));

    let d = doc("<script>let s = './comp");
    assert!(!d.is_in_import_path(Position::new(0, 23)));
}

#[test]
fn test_plain_text_content_and_seam() {
    let d = doc("<div>text</div>");
    assert!(d.is_plain_text_content(Position::new(0, 7)));
    assert!(!d.is_plain_text_content(Position::new(0, 3)));

    let d = doc("<div></div>");
    assert!(d.is_at_tag_seam(Position::new(0, 5)));
    assert!(!d.is_at_tag_seam(Position::new(0, 4)));
}

#[test]
fn test_moustache_is_not_text_content() {
    let d = doc("<div>{count}</div>");
    assert!(!d.is_plain_text_content(Position::new(0, 8)));
}

#[test]
fn test_script_region_for_position() {
    let d = doc("<script context=\"module\">let m;</script>\n<script>let i;</script>");
    let module = d.script_region_for(Position::new(0, 28)).unwrap();
    assert!(d.text()[module.content.start as usize..module.content.end() as usize]
        .contains("let m"));
    // Anywhere else prefers the instance region.
    let instance = d.script_region_for(Position::new(1, 10)).unwrap();
    assert!(d.text()[instance.content.start as usize..instance.content.end() as usize]
        .contains("let i"));
}

#[test]
fn test_has_unclosed_tag() {
    assert!(doc("<div>\n<Wid").has_unclosed_tag());
    assert!(!doc("<div></div>").has_unclosed_tag());
    assert!(!doc("a < b").has_unclosed_tag());
}

#[test]
fn test_chars_around() {
    let d = doc("<MyComp />");
    assert_eq!(d.chars_around(Position::new(0, 8)), (Some(' '), Some('/')));
}
