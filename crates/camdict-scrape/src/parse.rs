//! DOM traversal over the dictionary page markup.
//!
//! Every structural assumption about the page (class names, nesting) lives
//! in the selector statics and the small extraction functions below, so a
//! site markup change stays a localized fix. A page that doesn't match is
//! never an error: whatever is missing is simply left empty.

use std::sync::LazyLock;

use camdict_core::{CAMBRIDGE_BASE, LookupRecord, Pronunciation};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static PAGE: LazyLock<Selector> = LazyLock::new(|| sel("div.page"));
static DI_BODY: LazyLock<Selector> = LazyLock::new(|| sel("div.di-body"));
static ENTRY: LazyLock<Selector> = LazyLock::new(|| sel("div.entry-body__el"));
static POS_HEADER: LazyLock<Selector> = LazyLock::new(|| sel("div.pos-header"));
static DPRON: LazyLock<Selector> = LazyLock::new(|| sel("span.dpron-i"));
static REGION: LazyLock<Selector> = LazyLock::new(|| sel("span.region"));
static PRON: LazyLock<Selector> = LazyLock::new(|| sel("span.pron"));
static AUDIO_SOURCE: LazyLock<Selector> = LazyLock::new(|| sel(r#"source[type="audio/mpeg"]"#));
static POSGRAM: LazyLock<Selector> = LazyLock::new(|| sel("div.posgram"));
static SENSE: LazyLock<Selector> = LazyLock::new(|| sel("div.pos-body"));
static RUNON_POS: LazyLock<Selector> = LazyLock::new(|| sel("span.pos"));
static RUNON_GRAM: LazyLock<Selector> = LazyLock::new(|| sel("span.gram"));
static RUNON_TITLE: LazyLock<Selector> = LazyLock::new(|| sel("h3.runon-title"));
static SENSE_BODY: LazyLock<Selector> =
    LazyLock::new(|| sel("div.sense-body, div.runon-body.pad-indent"));
static GUIDEWORD: LazyLock<Selector> = LazyLock::new(|| sel("span.guideword"));
static DEF_INFO: LazyLock<Selector> = LazyLock::new(|| sel("span.def-info"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| sel("span.lab"));
static DEF: LazyLock<Selector> = LazyLock::new(|| sel("div.def"));
static TRANS: LazyLock<Selector> = LazyLock::new(|| sel("span.trans"));
static EXAMPLE: LazyLock<Selector> = LazyLock::new(|| sel("div.examp.dexamp"));
static PHRASE_HEAD: LazyLock<Selector> = LazyLock::new(|| sel("span.phrase-head"));
static PHRASE_BODY: LazyLock<Selector> = LazyLock::new(|| sel("div.phrase-body.pad-indent"));
static LIGHTBOX: LazyLock<Selector> = LazyLock::new(|| sel("img.lightboxLink"));

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// Parse one dictionary page into a lookup record.
///
/// `is_english` picks the top-level container class: the monolingual page
/// wraps its content in `div.page`, the bilingual editions in `div.di-body`.
/// `word` and `url` are left for the caller to attach.
pub fn parse_page(html: &str, is_english: bool) -> LookupRecord {
    let doc = Html::parse_document(html);
    let mut record = LookupRecord::default();

    let container_sel = if is_english { &*PAGE } else { &*DI_BODY };
    let container = match doc.select(container_sel).next() {
        Some(container) => container,
        None => {
            tracing::debug!("top-level container missing, returning empty record");
            return record;
        }
    };

    let mut header_found = false;
    for entry in container.select(&ENTRY) {
        // Pronunciations come from the first entry's header only.
        if !header_found {
            if let Some(header) = entry.select(&POS_HEADER).next() {
                extract_pronunciation(header, &mut record.pronunciation);
                header_found = true;
            }
        }

        let mut pos_gram = entry
            .select(&POSGRAM)
            .next()
            .map(|el| plain_text(&el))
            .unwrap_or_default();

        for sense in entry.select(&SENSE) {
            let mut runon_title = None;
            if first_class(sense) == Some("runon") {
                // Derived-word continuation: its own pos/gram replaces the
                // entry's for this and all following senses.
                if let Some(pos) = sense.select(&RUNON_POS).next() {
                    let gram = sense
                        .select(&RUNON_GRAM)
                        .next()
                        .map(|el| plain_text(&el))
                        .unwrap_or_default();
                    pos_gram = format!("{}{}", plain_text(&pos), gram);
                }
                runon_title = sense.select(&RUNON_TITLE).next().map(|el| plain_text(&el));
            }

            let guideword = single_guideword(sense);

            if let Some(body) = sense.select(&SENSE_BODY).next() {
                let ctx = DefContext {
                    pos_gram: &pos_gram,
                    runon_title: runon_title.as_deref(),
                    guideword: guideword.as_deref(),
                };
                for block in body.children().filter_map(ElementRef::wrap) {
                    extract_block(block, &ctx, None, &mut record.definitions);
                }
            }

            if let Some(image) = sense.select(&LIGHTBOX).next() {
                if let Some(src) = image.value().attr("data-image") {
                    record.image = format!("{CAMBRIDGE_BASE}{src}");
                }
                if let Some(src) = image.value().attr("src") {
                    record.thumb = format!("{CAMBRIDGE_BASE}{src}");
                }
            }
        }
    }

    record
}

/// Tags inherited from the enclosing entry/sense, applied to every
/// definition block found beneath it.
struct DefContext<'a> {
    pos_gram: &'a str,
    runon_title: Option<&'a str>,
    guideword: Option<&'a str>,
}

fn extract_pronunciation(header: ElementRef, out: &mut Pronunciation) {
    for dpron in header.select(&DPRON) {
        let region = dpron
            .select(&REGION)
            .next()
            .map(|el| plain_text(&el))
            .unwrap_or_default();
        let phonetic = dpron
            .select(&PRON)
            .next()
            .map(|el| plain_text(&el))
            .unwrap_or_default();
        let audio = dpron
            .select(&AUDIO_SOURCE)
            .next()
            .and_then(|source| source.value().attr("src"))
            .map(|src| format!("{CAMBRIDGE_BASE}{src}"));

        if region == "us" {
            out.ame = phonetic;
            if let Some(audio) = audio {
                out.ame_mp3 = audio;
            }
        } else {
            out.bre = phonetic;
            if let Some(audio) = audio {
                out.bre_mp3 = audio;
            }
        }
    }
}

/// A sense's guideword counts only when the sense carries exactly one
/// guideword marker; anything else is ambiguous and yields no tag.
fn single_guideword(sense: ElementRef) -> Option<String> {
    let mut markers = sense.select(&GUIDEWORD);
    match (markers.next(), markers.next()) {
        (Some(marker), None) => Some(spaced_text(&marker)).filter(|text| !text.is_empty()),
        _ => None,
    }
}

/// Dispatch one child block of a sense/phrase body by its first class name:
/// `def-block` and `runon-body` emit a definition string, `phrase-block`
/// recurses with its header attached, anything else is skipped.
fn extract_block(
    block: ElementRef,
    ctx: &DefContext,
    phrase: Option<&str>,
    out: &mut Vec<String>,
) {
    match first_class(block) {
        Some("def-block") | Some("runon-body") => {}
        Some("phrase-block") => {
            let head = block.select(&PHRASE_HEAD).next().map(|el| plain_text(&el));
            if let Some(body) = block.select(&PHRASE_BODY).next() {
                for child in body.children().filter_map(ElementRef::wrap) {
                    extract_block(child, ctx, head.as_deref(), out);
                }
            }
            return;
        }
        _ => return,
    }

    let def_info = block
        .select(&DEF_INFO)
        .next()
        .map(|el| normalize_text(&spaced_text(&el).replace('›', "")))
        .unwrap_or_default();

    let mut labels: Vec<String> = block
        .select(&LABEL)
        .map(|el| plain_text(&el))
        .filter(|text| !text.is_empty())
        .collect();
    if labels.is_empty() {
        // Labels often sit on the wrapping pr div rather than the block.
        if let Some(pr) = nearest_ancestor(block, "div", "pr") {
            labels = pr
                .select(&LABEL)
                .map(|el| plain_text(&el))
                .filter(|text| !text.is_empty())
                .collect();
        }
    }

    let definition = block
        .select(&DEF)
        .next()
        .map(|el| spaced_text(&el))
        .filter(|text| !text.is_empty());
    let translation = block
        .select(&TRANS)
        .next()
        .map(|el| spaced_text(&el))
        .filter(|text| !text.is_empty());

    let tags: Vec<&str> = [
        Some(ctx.pos_gram),
        ctx.runon_title,
        phrase,
        ctx.guideword,
        Some(def_info.as_str()),
    ]
    .into_iter()
    .flatten()
    .chain(labels.iter().map(String::as_str))
    .filter(|tag| !tag.is_empty())
    .collect();
    let tag_text = tags
        .iter()
        .map(|tag| format!("[{tag}]"))
        .collect::<Vec<_>>()
        .join(" ");

    let main_text = [definition, translation]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let mut text_blocks = Vec::new();
    if !main_text.is_empty() {
        text_blocks.push(main_text);
    }
    for example in block.select(&EXAMPLE) {
        let line = spaced_text(&example);
        if !line.is_empty() {
            text_blocks.push(format!("- {line}"));
        }
    }
    let body_text = text_blocks.join("\n");

    let full_text = [tag_text, body_text]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    out.push(full_text);
}

/// Collapse whitespace runs and tighten spacing around punctuation.
pub fn normalize_text(text: &str) -> String {
    static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
    static BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").unwrap());
    static AFTER_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s+").unwrap());
    static BEFORE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\)").unwrap());

    let text = WS_RUN.replace_all(text, " ");
    let text = text.trim();
    let text = BEFORE_PUNCT.replace_all(text, "$1");
    let text = AFTER_OPEN.replace_all(&text, "(");
    BEFORE_CLOSE.replace_all(&text, ")").into_owned()
}

/// Concatenated text content, trimmed but otherwise untouched.
fn plain_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text content with descendant fragments space-joined, then normalized.
fn spaced_text(el: &ElementRef) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

fn first_class<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.value()
        .attr("class")
        .and_then(|classes| classes.split_whitespace().next())
}

fn nearest_ancestor<'a>(el: ElementRef<'a>, name: &str, class: &str) -> Option<ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap).find(|ancestor| {
        ancestor.value().name() == name && ancestor.value().classes().any(|c| c == class)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_page(body: &str) -> String {
        format!(
            r#"<html><body><div class="page"><div class="entry-body__el">{body}</div></div></body></html>"#
        )
    }

    #[test]
    fn test_missing_container_yields_empty_record() {
        let record = parse_page("<html><body><p>not found</p></body></html>", true);
        assert_eq!(record.pronunciation, Default::default());
        assert!(record.definitions.is_empty());
        assert!(record.image.is_empty());
        assert!(record.thumb.is_empty());
    }

    #[test]
    fn test_container_class_depends_on_language() {
        let html = r#"<div class="di-body"><div class="entry-body__el">
            <div class="posgram">noun</div>
            <div class="pos-body"><div class="sense-body">
                <div class="def-block"><div class="def">a trial</div></div>
            </div></div>
        </div></div>"#;
        assert!(parse_page(html, true).definitions.is_empty());
        assert_eq!(parse_page(html, false).definitions, vec!["[noun] a trial"]);
    }

    #[test]
    fn test_minimal_entry_tag_precedes_text() {
        let html = entry_page(
            r#"<div class="pos-header"><div class="posgram">verb</div></div>
            <div class="pos-body"><div class="sense-body">
                <div class="def-block"><div class="def">to move quickly</div></div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions.len(), 1);
        let definition = &record.definitions[0];
        let tag_at = definition.find("[verb]").expect("pos tag missing");
        let text_at = definition.find("to move quickly").expect("text missing");
        assert!(tag_at < text_at);
    }

    #[test]
    fn test_pronunciation_regions_and_audio() {
        let html = entry_page(
            r#"<div class="pos-header">
                <span class="dpron-i"><span class="region">us</span>
                    <span class="pron">/rʌn/</span>
                    <source type="audio/mpeg" src="media/english/us_pron/run.mp3">
                </span>
                <span class="dpron-i"><span class="region">uk</span>
                    <span class="pron">/rʌn/</span>
                </span>
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.pronunciation.ame, "/rʌn/");
        assert_eq!(record.pronunciation.bre, "/rʌn/");
        assert_eq!(
            record.pronunciation.ame_mp3,
            "https://dictionary.cambridge.org/media/english/us_pron/run.mp3"
        );
        assert_eq!(record.pronunciation.bre_mp3, "");
    }

    #[test]
    fn test_pronunciation_from_first_entry_only() {
        let html = r#"<html><body><div class="page">
            <div class="entry-body__el"><div class="pos-header">
                <span class="dpron-i"><span class="region">us</span><span class="pron">/first/</span></span>
            </div></div>
            <div class="entry-body__el"><div class="pos-header">
                <span class="dpron-i"><span class="region">us</span><span class="pron">/second/</span></span>
            </div></div>
            </div></body></html>"#;
        let record = parse_page(html, true);
        assert_eq!(record.pronunciation.ame, "/first/");
    }

    #[test]
    fn test_phrase_header_becomes_tag() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body"><div class="sense-body">
                <div class="phrase-block">
                    <span class="phrase-head">run away</span>
                    <div class="phrase-body pad-indent">
                        <div class="def-block"><div class="def">to escape</div></div>
                    </div>
                </div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[verb] [run away] to escape"]);
    }

    #[test]
    fn test_runon_overrides_pos_and_adds_title() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="runon pos-body">
                <h3 class="runon-title">runner</h3>
                <span class="pos">noun</span>
                <div class="runon-body pad-indent">
                    <div class="def-block"><div class="def">a person who runs</div></div>
                </div>
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[noun] [runner] a person who runs"]);
    }

    #[test]
    fn test_single_guideword_is_tagged() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body">
                <span class="guideword">MOVE</span>
                <div class="sense-body">
                    <div class="def-block"><div class="def">to go fast</div></div>
                </div>
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[verb] [MOVE] to go fast"]);
    }

    #[test]
    fn test_multiple_guidewords_are_ignored() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body">
                <span class="guideword">MOVE</span>
                <span class="guideword">OPERATE</span>
                <div class="sense-body">
                    <div class="def-block"><div class="def">to go fast</div></div>
                </div>
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[verb] to go fast"]);
    }

    #[test]
    fn test_labels_fall_back_to_enclosing_pr() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body"><div class="pr dsense">
                <span class="lab">informal</span>
                <div class="sense-body">
                    <div class="def-block"><div class="def">to leave</div></div>
                </div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[verb] [informal] to leave"]);
    }

    #[test]
    fn test_def_info_annotation_stripped_of_marker() {
        let html = entry_page(
            r#"<div class="posgram">noun</div>
            <div class="pos-body"><div class="sense-body">
                <div class="def-block">
                    <span class="def-info">mainly UK ›</span>
                    <div class="def">a contest</div>
                </div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[noun] [mainly UK] a contest"]);
    }

    #[test]
    fn test_translation_and_examples() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body"><div class="sense-body">
                <div class="def-block">
                    <div class="def">to move quickly</div>
                    <span class="trans">跑</span>
                    <div class="examp dexamp">We ran home.</div>
                    <div class="examp dexamp">Run faster!</div>
                </div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(
            record.definitions,
            vec!["[verb] to move quickly 跑\n- We ran home.\n- Run faster!"]
        );
    }

    #[test]
    fn test_lightbox_image_and_thumb() {
        let html = entry_page(
            r#"<div class="pos-body">
                <img class="lightboxLink" src="images/thumb/run.jpg" data-image="images/full/run.jpg">
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(
            record.image,
            "https://dictionary.cambridge.org/images/full/run.jpg"
        );
        assert_eq!(
            record.thumb,
            "https://dictionary.cambridge.org/images/thumb/run.jpg"
        );
    }

    #[test]
    fn test_later_image_overwrites_earlier() {
        let html = entry_page(
            r#"<div class="pos-body">
                <img class="lightboxLink" src="a_thumb.jpg" data-image="a.jpg">
            </div>
            <div class="pos-body">
                <img class="lightboxLink" src="b_thumb.jpg" data-image="b.jpg">
            </div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.image, "https://dictionary.cambridge.org/b.jpg");
        assert_eq!(record.thumb, "https://dictionary.cambridge.org/b_thumb.jpg");
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let html = entry_page(
            r#"<div class="posgram">verb</div>
            <div class="pos-body"><div class="sense-body">
                <div class="share">share widget</div>
                <div class="def-block"><div class="def">to go fast</div></div>
            </div></div>"#,
        );
        let record = parse_page(&html, true);
        assert_eq!(record.definitions, vec!["[verb] to go fast"]);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  to  move\n quickly "), "to move quickly");
        assert_eq!(normalize_text("fast , loose ;"), "fast, loose;");
        assert_eq!(normalize_text("( informal )"), "(informal)");
    }
}
