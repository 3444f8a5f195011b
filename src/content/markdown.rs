//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::config::SiteConfig;
use crate::helpers::{html_escape, is_external_link};

const MORE_MARKER: &str = "<!-- more -->";

/// Tags that syntect's bundled grammars do not answer to on their own
const BUILTIN_ALIASES: [(&str, &str); 9] = [
    ("shell", "Bourne Again Shell (bash)"),
    ("console", "Bourne Again Shell (bash)"),
    ("zsh", "Bourne Again Shell (bash)"),
    ("jsx", "JavaScript"),
    ("ts", "JavaScript"),
    ("tsx", "JavaScript"),
    ("typescript", "JavaScript"),
    ("golang", "Go"),
    ("patch", "Diff"),
];

/// Highlighting grammars, looked up by the language tag of a fenced block
pub struct GrammarRegistry {
    syntax_set: SyntaxSet,
    aliases: HashMap<String, String>,
}

impl GrammarRegistry {
    /// syntect's bundled grammars plus the built-in aliases
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            aliases: HashMap::new(),
        };
        for (tag, grammar) in BUILTIN_ALIASES {
            registry.register_alias(tag, grammar);
        }
        registry
    }

    /// Make `tag` select `grammar` (a grammar name or an already known tag).
    /// Returns false, registering nothing, when `grammar` is unknown.
    pub fn register_alias(&mut self, tag: &str, grammar: &str) -> bool {
        let Some(name) = self.resolve(grammar).map(|s| s.name.clone()) else {
            return false;
        };
        self.aliases.insert(tag.to_lowercase(), name);
        true
    }

    /// Grammar for a language tag; `None` for unregistered tags
    pub fn find(&self, tag: &str) -> Option<&SyntaxReference> {
        let tag = tag.to_lowercase();
        self.aliases
            .get(&tag)
            .and_then(|name| self.syntax_set.find_syntax_by_name(name))
            .or_else(|| self.resolve(&tag))
    }

    /// Best-effort guess from the first line (shebangs, `<?xml`, ...)
    pub fn detect(&self, code: &str) -> Option<&SyntaxReference> {
        let first_line = code.lines().next()?;
        self.syntax_set
            .find_syntax_by_first_line(first_line)
            .filter(|s| !is_plain_text(s))
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    fn resolve(&self, grammar: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_name(grammar)
            .or_else(|| self.syntax_set.find_syntax_by_token(grammar))
            .filter(|s| !is_plain_text(s))
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn is_plain_text(syntax: &SyntaxReference) -> bool {
    syntax.name == "Plain Text"
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    registry: GrammarRegistry,
    theme: Option<Theme>,
    highlight: bool,
    line_numbers: bool,
    auto_detect: bool,
    mark_external: bool,
    internal_hosts: Vec<String>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove(theme).or_else(|| {
            tracing::warn!("Unknown highlight theme `{}`, using a default", theme);
            theme_set.themes.into_values().next()
        });

        Self {
            registry: GrammarRegistry::with_defaults(),
            theme,
            highlight: true,
            line_numbers,
            auto_detect: false,
            mark_external: true,
            internal_hosts: Vec::new(),
        }
    }

    /// Create from the site's highlight and external link settings
    pub fn from_config(config: &SiteConfig) -> Self {
        let highlight = &config.highlight;
        let mut renderer = Self::with_options(&highlight.theme, highlight.line_number);
        renderer.highlight = highlight.enable;
        renderer.auto_detect = highlight.auto_detect;
        renderer.mark_external = config.external_link.enable;

        for (tag, grammar) in &highlight.aliases {
            if !renderer.registry.register_alias(tag, grammar) {
                tracing::warn!("Ignoring alias `{}`: no grammar named `{}`", tag, grammar);
            }
        }

        renderer.internal_hosts = config
            .host()
            .into_iter()
            .chain(config.external_link.exclude.iter().cloned())
            .collect();
        renderer
    }

    /// Hosts whose links are left untouched
    pub fn with_internal_hosts(mut self, hosts: Vec<String>) -> Self {
        self.internal_hosts = hosts;
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // We handle front-matter separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language tag, collected source) while inside a code block
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) if self.is_external(&dest_url) => {
                    events.push(Event::InlineHtml(CowStr::from(external_anchor(
                        &dest_url, &title,
                    ))));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn is_external(&self, href: &str) -> bool {
        self.mark_external && is_external_link(href, &self.internal_hosts)
    }

    /// Highlight a code block. Unregistered tags render as plain text.
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = match lang {
            Some(tag) => self.registry.find(tag),
            None if self.auto_detect => self.registry.detect(code),
            None => None,
        };

        let (Some(syntax), Some(theme), true) = (syntax, self.theme.as_ref(), self.highlight)
        else {
            if let Some(tag) = lang {
                if self.registry.find(tag).is_none() {
                    tracing::debug!("No grammar registered for `{}`, rendering plain", tag);
                }
            }
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, self.registry.syntax_set(), syntax, theme) {
            Ok(highlighted) => {
                let class = lang.map(str::to_lowercase).unwrap_or_else(|| {
                    syntax.name.to_lowercase().replace(' ', "-")
                });
                if self.line_numbers {
                    add_line_numbers(&highlighted, code, &class)
                } else {
                    format!(
                        "<figure class=\"highlight {}\">{}</figure>\n",
                        html_escape(&class),
                        highlighted
                    )
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting failed, rendering plain: {}", e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Split the body at `<!-- more -->`.
    /// Returns (excerpt, body without the marker).
    pub fn split_excerpt(content: &str) -> (Option<&str>, String) {
        match find_more_marker(content) {
            Some(pos) => {
                let excerpt = content[..pos].trim();
                let rest = content[pos + MORE_MARKER.len()..].trim_start();
                (Some(excerpt), format!("{}\n\n{}", excerpt, rest))
            }
            None => (None, content.to_string()),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset of the first marker written as HTML; markers inside code do not count
fn find_more_marker(content: &str) -> Option<usize> {
    Parser::new(content)
        .into_offset_iter()
        .find_map(|(event, range)| match event {
            Event::Html(_) | Event::InlineHtml(_) => content[range.clone()]
                .find(MORE_MARKER)
                .map(|i| range.start + i),
            _ => None,
        })
}

fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
    }
}

fn add_line_numbers(highlighted: &str, code: &str, class: &str) -> String {
    let gutter = (1..=code.lines().count().max(1))
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        html_escape(class),
        gutter,
        highlighted
    ) + "\n"
}

fn external_anchor(href: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, html_escape(title))
    };
    format!(
        r#"<a href="{}"{} target="_blank" rel="noopener noreferrer">"#,
        html_escape(href),
        title
    )
}
