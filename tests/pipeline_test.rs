//! Integration tests for validation, extraction, layout and local rendering.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use texpage::extract::{clean, rules};
use texpage::layout::wrap;
use texpage::{
    render_local, validate, FixedClock, FontMetrics, LayoutEngine, LayoutOptions, OutputFormat,
    PageRenderer, SectionLevel, StructureExtractor, StyleTag, ValidationError,
};

const MINIMAL: &str = r"\documentclass{article}\begin{document}\end{document}";

const PAPER: &str = r"\documentclass[11pt]{article}
\usepackage{amsmath}
% Draft: do not circulate
\title{On \emph{Greedy} Layout}
\author{Ada Lovelace\thanks{Analytical Engine Co.} \and Charles Babbage}
\date{\today}
\begin{document}
\maketitle
\begin{abstract}
We show that greedy wrapping is \textbf{good enough}.
\end{abstract}

\section{Introduction}\label{sec:intro}
Typesetting is hard~\cite{knuth84}. See Section~\ref{sec:method}.

Inline math $a+b$ stays short.

\section{Method}\label{sec:method}
$$ E = mc^2 $$
\subsection*{Details}
Costs 5\% more \& takes longer.
\subsubsection{Empty}
\label{nothing}
\begin{thebibliography}{9}
\bibitem{knuth84} D. Knuth. \textit{The TeXbook}. 1984.
\bibitem{lamport} L. Lamport. LaTeX.
\end{thebibliography}
\end{document}
";

fn extractor() -> StructureExtractor {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
    StructureExtractor::with_clock(Arc::new(FixedClock::new(now)))
}

#[test]
fn test_missing_markers_fail_validation() {
    for marker in [r"\documentclass", r"\begin{document}", r"\end{document}"] {
        let source = PAPER.replace(marker, "");
        assert!(
            matches!(validate(&source), Err(ValidationError::MissingMarker(m)) if m == marker),
            "removing {} should fail",
            marker
        );
    }
}

#[test]
fn test_unbalanced_braces_report_counts() {
    let source = format!("{}{{{{", MINIMAL);
    assert_eq!(
        validate(&source),
        Err(ValidationError::UnbalancedBraces(5, 3))
    );
}

#[test]
fn test_missing_begin_document_scenario() {
    let source = r"\documentclass{article}\title{Report}\begin{abstract}Hello world.\end{abstract}\end{document}";
    assert_eq!(
        validate(source),
        Err(ValidationError::MissingMarker(r"\begin{document}"))
    );
}

#[test]
fn test_minimal_document_scenario() {
    assert!(validate(MINIMAL).is_ok());

    let model = extractor().extract(MINIMAL);
    assert_eq!(model.title, "Document");
    assert!(model.sections.is_empty());
    assert!(model.bibliography.is_empty());

    let png = render_local(MINIMAL, OutputFormat::Png).unwrap();
    assert!(!png.is_empty());
    assert!(png.starts_with(b"\x89PNG"));
}

#[test]
fn test_extract_paper() {
    assert!(validate(PAPER).is_ok());
    let model = extractor().extract(PAPER);

    assert_eq!(model.title, "On Greedy Layout");
    assert_eq!(model.author, "Ada Lovelace\nCharles Babbage");
    assert_eq!(model.date, "October 16, 2026");
    assert_eq!(
        model.abstract_text,
        "We show that greedy wrapping is good enough."
    );

    let titles: Vec<&str> = model.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Introduction", "Method", "Details"]);
    assert_eq!(model.sections[2].level, SectionLevel::Subsection);

    let intro = &model.sections[0].content;
    assert!(intro.contains("[citation]"));
    assert!(intro.contains("[ref]"));
    assert!(intro.contains("[Math]"));
    assert!(intro.contains("\n\n"));

    assert_eq!(model.sections[1].content, "[Equation]");
    assert_eq!(model.equations, vec!["E = mc^2".to_string()]);
    assert_eq!(model.bibliography.len(), 2);
    assert_eq!(model.bibliography[0], "D. Knuth. The TeXbook. 1984.");
}

#[test]
fn test_empty_section_dropped() {
    let source = r"\section{H1}Body text.\section{H2}\label{x}";
    let sections = rules::extract_sections(source);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "H1");
}

#[test]
fn test_extract_is_total() {
    let inputs = [
        "",
        "\\",
        "{{{{",
        "\\title{",
        "\\begin{abstract}",
        "$$$$$",
        "\\section*{}\\section{}",
        "%%%%\n%",
        "\u{0}\u{FFFF}",
    ];
    for input in inputs {
        let model = extractor().extract(input);
        assert!(!model.title.is_empty());
    }
}

#[test]
fn test_clean_is_idempotent() {
    let samples = [
        r"Plain text.",
        r"\textbf{Bold} and \emph{\textit{nested}} text",
        r"Math $x^2$ and $$y$$ and \[z\] inline \(w\)",
        r"Escaped \$5 and 10\% \& more",
        r"\cite{a,b} \ref{c} \label{d} \href{http://x}{link}",
        "Line\\\\break~here   with   spaces\n\n\n\nand gaps",
        r"\begin{itemize}\item One \item Two\end{itemize}",
        r"\unknown{arg} \command stray { braces }",
        r"keep\\% comment",
        r"\begin{col2}text\end{col2}",
        r"Ünïcödé é",
    ];
    for sample in samples {
        let once = clean(sample);
        assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
    }
}

#[test]
fn test_wrap_respects_width() {
    let metrics = FontMetrics::new(7.0, 10.0);
    let text = "The quick brown fox jumps over the lazy dog while an \
                extraordinarilylongwordthatcannotfit sits alone.";
    for width in [50.0, 100.0, 175.0] {
        for line in wrap(text, width, &metrics) {
            assert!(metrics.text_width(&line) <= width || !line.contains(' '));
        }
    }
}

#[test]
fn test_layout_paper_styles() {
    let model = extractor().extract(PAPER);
    let page = LayoutEngine::default().layout(&model);

    assert_eq!(page.lines[0].style, StyleTag::Title);
    assert_eq!(page.lines_with_style(StyleTag::Author).count(), 2);
    assert_eq!(page.lines_with_style(StyleTag::Date).count(), 1);
    assert!(page
        .lines
        .iter()
        .any(|l| l.style == StyleTag::Heading2 && l.text == "Abstract"));
    assert_eq!(page.lines_with_style(StyleTag::Reference).count(), 2);
    assert!(!page.truncated);
}

#[test]
fn test_long_document_is_cut_off() {
    let body = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(20);
    let mut source = String::from("\\documentclass{article}\\begin{document}");
    for i in 0..40 {
        source.push_str(&format!("\\section{{Part {}}}{}\n", i, body));
    }
    source.push_str("\\end{document}");

    let options = LayoutOptions::default();
    let model = extractor().extract(&source);
    let page = LayoutEngine::new(options.clone()).layout(&model);

    assert!(page.truncated);
    assert!(page.omitted_sections > 0);
    assert!(page.lines.iter().all(|l| l.y <= options.max_content_y()));
}

#[test]
fn test_render_distinct_timestamps() {
    let model = extractor().extract(PAPER);
    let options = LayoutOptions::default();
    let page = LayoutEngine::new(options.clone()).layout(&model);

    let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();
    let a = PageRenderer::with_clock(options.clone(), Arc::new(FixedClock::new(t1)))
        .render(&page, OutputFormat::Png)
        .unwrap();
    let b = PageRenderer::with_clock(options, Arc::new(FixedClock::new(t2)))
        .render(&page, OutputFormat::Png)
        .unwrap();

    assert_ne!(a, b);
}
