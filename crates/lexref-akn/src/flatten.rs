//! Mixed-content flattener.
//!
//! Inline elements interleaved with prose (cross-references, amendment
//! markers, note references) would detach their text from the surrounding
//! sentence if left for the structural parser. Collapsing them to plain text
//! first keeps the original left-to-right reading order intact.
//!
//! This is a pure text rewrite: it never fails, and inline markup that does
//! not match the expected patterns is left exactly as written.

use std::sync::LazyLock;

use regex::Regex;

/// Paired inline kinds: tags stripped, inner text kept in place.
static PAIRED_OPEN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<(?:ref|ins|del|note|authorialNote)(?:\s[^>]*)?>").unwrap()
});

static PAIRED_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"</(?:ref|ins|del|note|authorialNote)\s*>").unwrap()
});

/// Self-closing inline kinds: removed outright, they carry no prose.
static SELF_CLOSING: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<(?:noteRef|marker)(?:\s[^>]*)?/>").unwrap()
});

/// Collapse the fixed set of inline element kinds into plain text.
///
/// Self-closing kinds are removed before and after the paired-tag strip:
/// stripping a paired element can expose a self-closing element that was
/// nested inside it, and the second pass picks those up. Idempotent.
pub fn flatten_inline(markup: &str) -> String {
  let pass1 = SELF_CLOSING.replace_all(markup, "");
  let pass2 = PAIRED_OPEN.replace_all(&pass1, "");
  let pass3 = PAIRED_CLOSE.replace_all(&pass2, "");
  SELF_CLOSING.replace_all(&pass3, "").into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ref_collapses_to_inner_text() {
    let input = r##"<p>see <ref href="#s2">section 2</ref> below</p>"##;
    assert_eq!(flatten_inline(input), "<p>see section 2 below</p>");
  }

  #[test]
  fn ins_and_del_keep_inner_text() {
    let input = "<p>the <ins>new</ins> and <del>old</del> wording</p>";
    assert_eq!(flatten_inline(input), "<p>the new and old wording</p>");
  }

  #[test]
  fn self_closing_note_ref_removed() {
    let input = r##"<p>data<noteRef href="#f1" marker="1"/> controller</p>"##;
    assert_eq!(flatten_inline(input), "<p>data controller</p>");
  }

  #[test]
  fn nested_self_closing_inside_paired_removed_in_second_pass() {
    let input = r##"<p><ins>text<noteRef href="#f2"/> more</ins></p>"##;
    assert_eq!(flatten_inline(input), "<p>text more</p>");
  }

  #[test]
  fn surrounding_structure_untouched() {
    let input = "<section><num>1</num><content><p>plain</p></content></section>";
    assert_eq!(flatten_inline(input), input);
  }

  #[test]
  fn idempotent_on_flattened_text() {
    let input = r##"<p>see <ref href="#s2">s 2</ref><marker/></p>"##;
    let once = flatten_inline(input);
    assert_eq!(flatten_inline(&once), once);
  }

  #[test]
  fn malformed_inline_markup_left_as_is() {
    // Truncated ref tag with no terminating '>' matches no pattern.
    let input = "<p>broken <ref href=\"#s2";
    assert_eq!(flatten_inline(input), input);
  }

  #[test]
  fn refx_element_is_not_a_ref() {
    // Prefix match must not swallow other element names.
    let input = "<refx>kept</refx>";
    assert_eq!(flatten_inline(input), input);
  }
}
