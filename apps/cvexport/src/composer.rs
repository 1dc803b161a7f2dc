//! Template Composer — flattens the fixed partial chain into one document source.
//!
//! Chain: `main template → cv_template.typ → chicv.typ → fontawesome.typ`.
//! Each supporting partial is pulled into its dependent by replacing one exact
//! import directive, bottom-up, so the result carries no cross-file references.
//! This is deliberately not an import resolver: the chain is a constant.

use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::store::PartialStore;

/// A supporting partial and the directive its dependent uses to import it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialLink {
    pub name: &'static str,
    pub directive: &'static str,
}

/// Icon glyph library, imported by the style library.
pub const GLYPH_LIBRARY: PartialLink = PartialLink {
    name: "fontawesome.typ",
    directive: "#import \"fontawesome.typ\": *",
};

/// Shared style library, imported by the layout template.
pub const STYLE_LIBRARY: PartialLink = PartialLink {
    name: "chicv.typ",
    directive: "#import \"chicv.typ\": *",
};

/// Layout template, imported by every top-level template.
pub const LAYOUT_TEMPLATE: PartialLink = PartialLink {
    name: "cv_template.typ",
    directive: "#import \"cv_template.typ\": cv",
};

/// Supporting partials, leaf first. Inlining walks this list in order.
pub const TEMPLATE_CHAIN: [PartialLink; 3] = [GLYPH_LIBRARY, STYLE_LIBRARY, LAYOUT_TEMPLATE];

/// Retrieves the top-level template and the three supporting partials concurrently,
/// then inlines them bottom-up.
///
/// Any retrieval failure aborts with `SourceUnavailable`; nothing partial is returned.
pub async fn compose(store: &dyn PartialStore, template_name: &str) -> Result<String, PipelineError> {
    let [glyphs, style, layout] = TEMPLATE_CHAIN;

    let (main, glyphs, style, layout) = tokio::try_join!(
        fetch(store, template_name),
        fetch(store, glyphs.name),
        fetch(store, style.name),
        fetch(store, layout.name),
    )?;

    let composed = inline_chain(main, [glyphs, style, layout]);

    info!(
        "Composed '{}' ({} bytes after inlining)",
        template_name,
        composed.len()
    );

    Ok(composed)
}

async fn fetch(store: &dyn PartialStore, name: &str) -> Result<String, PipelineError> {
    store
        .get(name)
        .await
        .map_err(|e| PipelineError::source_unavailable(name, e))
}

/// Inlines `partials` (ordered like [`TEMPLATE_CHAIN`], leaf first) into `main`.
///
/// Step k replaces `TEMPLATE_CHAIN[k].directive` inside partial k+1 (or `main`
/// for the last link) with the text accumulated so far.
pub fn inline_chain(main: String, partials: [String; 3]) -> String {
    let [leaf, rest @ ..] = partials;
    let hosts = rest.into_iter().chain(std::iter::once(main));

    TEMPLATE_CHAIN
        .iter()
        .zip(hosts)
        .fold(leaf, |body, (link, host)| inline_partial(&host, *link, &body))
}

/// Single first-match substitution of `link.directive` in `host` with `body`.
///
/// A missing directive leaves `host` untouched.
pub fn inline_partial(host: &str, link: PartialLink, body: &str) -> String {
    match host.find(link.directive) {
        Some(start) => {
            let end = start + link.directive.len();
            let mut out = String::with_capacity(host.len() - link.directive.len() + body.len());
            out.push_str(&host[..start]);
            out.push_str(body);
            out.push_str(&host[end..]);
            out
        }
        None => {
            debug!(
                partial = link.name,
                "Import directive not found; partial was not inlined"
            );
            host.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::store::InMemoryPartialStore;

    fn chain_store() -> InMemoryPartialStore {
        InMemoryPartialStore::new()
            .with_partial("resume-en.typ", "#import \"cv_template.typ\": cv\n#cv()\n")
            .with_partial(
                "cv_template.typ",
                "#import \"chicv.typ\": *\n#let cv() = chiline()\n",
            )
            .with_partial(
                "chicv.typ",
                "#import \"fontawesome.typ\": *\n#let chiline() = fa-icon(\"line\")\n",
            )
            .with_partial("fontawesome.typ", "#let fa-icon(name) = text(name)\n")
    }

    #[test]
    fn test_inline_partial_replaces_only_first_occurrence() {
        let host = "A #import \"chicv.typ\": * B #import \"chicv.typ\": *";
        let out = inline_partial(host, STYLE_LIBRARY, "[style]");
        assert_eq!(out, "A [style] B #import \"chicv.typ\": *");
    }

    #[test]
    fn test_inline_partial_without_directive_is_identity() {
        let host = "#let x = 1";
        assert_eq!(inline_partial(host, GLYPH_LIBRARY, "ignored"), host);
    }

    #[test]
    fn test_inline_partial_does_not_expand_dollar_signs() {
        let out = inline_partial("#import \"fontawesome.typ\": *", GLYPH_LIBRARY, "$0 $1");
        assert_eq!(out, "$0 $1");
    }

    #[test]
    fn test_chain_order_is_leaf_first() {
        let names: Vec<&str> = TEMPLATE_CHAIN.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["fontawesome.typ", "chicv.typ", "cv_template.typ"]);
    }

    #[test]
    fn test_inline_chain_walks_links_leaf_first() {
        let out = inline_chain(
            "<main #import \"cv_template.typ\": cv>".to_string(),
            [
                "glyphs".to_string(),
                "<style #import \"fontawesome.typ\": *>".to_string(),
                "<layout #import \"chicv.typ\": *>".to_string(),
            ],
        );
        assert_eq!(out, "<main <layout <style glyphs>>>");
    }

    #[test]
    fn test_inline_chain_skips_link_without_directive() {
        let out = inline_chain(
            "<main #import \"cv_template.typ\": cv>".to_string(),
            [
                "glyphs".to_string(),
                "<style>".to_string(),
                "<layout #import \"chicv.typ\": *>".to_string(),
            ],
        );
        assert_eq!(out, "<main <layout <style>>>");
    }

    #[tokio::test]
    async fn test_compose_flattens_all_four_fragments_in_dependency_order() {
        let composed = compose(&chain_store(), "resume-en.typ").await.unwrap();

        assert_eq!(
            composed,
            "#let fa-icon(name) = text(name)\n\
             \n#let chiline() = fa-icon(\"line\")\n\
             \n#let cv() = chiline()\n\
             \n#cv()\n"
        );
        assert!(!composed.contains("#import"));
    }

    #[tokio::test]
    async fn test_compose_is_deterministic() {
        let store = chain_store();
        let first = compose(&store, "resume-en.typ").await.unwrap();
        let second = compose(&store, "resume-en.typ").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_glyph_library_is_source_unavailable() {
        let mut store = chain_store();
        store.remove("fontawesome.typ");

        let err = compose(&store, "resume-en.typ").await.unwrap_err();

        match err {
            PipelineError::SourceUnavailable { partial, source } => {
                assert_eq!(partial, "fontawesome.typ");
                assert!(matches!(source, StoreError::NotFound(_)));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_top_level_template_is_source_unavailable() {
        let err = compose(&chain_store(), "resume-fr.typ").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SourceUnavailable { ref partial, .. } if partial == "resume-fr.typ"
        ));
    }
}
