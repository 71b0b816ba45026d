use citelink_content::{
    BibRecord, Bibliography, BracketType, ContentBlock, LinkConfig, ReferenceKind, build_tree,
    link_citations,
};

fn numeric_document() -> (Vec<ContentBlock>, Bibliography) {
    let blocks = vec![
        ContentBlock::heading(1, "Introduction"),
        ContentBlock::paragraph("Prior work established the baseline [1] and refined it [2-4]."),
        ContentBlock::heading(1, "Methods"),
        ContentBlock::paragraph("We follow [5], avoiding [3-methyl-diphosphate] entirely."),
        ContentBlock::paragraph("Calibration follows [1], [2], [3] and [4]."),
        ContentBlock::heading(2, "Analysis"),
        ContentBlock::paragraph("Outliers were removed as in [2, 5]."),
    ];
    let bibliography = Bibliography::new(
        (1..=5)
            .map(|i| BibRecord {
                text: format!("Reference {i}"),
                ..Default::default()
            })
            .collect(),
    );
    (blocks, bibliography)
}

#[test]
fn numeric_document_end_to_end() {
    let (blocks, bibliography) = numeric_document();
    let mut tree = build_tree(&blocks);
    let outcome = link_citations(&mut tree, &bibliography, &LinkConfig::default()).unwrap();

    assert_eq!(outcome.style.bracket, BracketType::Square);
    assert_eq!(outcome.style.kind, ReferenceKind::Numeric);
    assert_eq!(outcome.stats.candidates, 9);
    assert_eq!(outcome.stats.resolved, 8);
    assert_eq!(outcome.stats.unresolved, 0);
    assert_eq!(outcome.stats.false_positives, 1); // the chemical name
    assert_eq!(outcome.stats.invalid_spans, 0);

    let references = tree.all_references();
    assert_eq!(references.len(), 8);

    // First paragraph: [1] then [2-4], ascending by start.
    let (paragraph, first) = &references[0];
    let (_, second) = &references[1];
    assert_eq!(references[1].0, *paragraph);
    assert!(first.start < second.start);
    assert_eq!(first.entries.iter().map(|e| e.0).collect::<Vec<_>>(), [0]);
    assert_eq!(
        second.entries.iter().map(|e| e.0).collect::<Vec<_>>(),
        [1, 2, 3]
    );

    // Resolved ids render as R-identifiers.
    let rids: Vec<&str> = second
        .entries
        .iter()
        .filter_map(|id| bibliography.get(*id))
        .map(|entry| entry.id())
        .collect();
    assert_eq!(rids, ["R2", "R3", "R4"]);
}

#[test]
fn name_year_document_end_to_end() {
    let blocks = vec![
        ContentBlock::heading(1, "Related Work"),
        ContentBlock::paragraph(
            "As shown (Smith, 2014) and later (Jones, 2015), windows matter.",
        ),
    ];
    let bibliography = Bibliography::new(vec![
        BibRecord {
            authors: vec!["Smith, John".into()],
            year: Some("2014".into()),
            text: "Smith J. Windowed matching. 2014.".into(),
        },
        BibRecord {
            authors: vec!["Jones, Mary".into()],
            year: Some("2015".into()),
            text: "Jones M. Later work. 2015.".into(),
        },
    ]);

    let mut tree = build_tree(&blocks);
    let outcome = link_citations(&mut tree, &bibliography, &LinkConfig::default()).unwrap();

    assert_eq!(outcome.style.bracket, BracketType::Parenthesis);
    assert_eq!(outcome.style.kind, ReferenceKind::NameYear);
    assert_eq!(outcome.stats.resolved, 2);

    let references = tree.all_references();
    assert_eq!(references.len(), 2);
    assert_eq!(
        references[0].1.entries.iter().map(|e| e.0).collect::<Vec<_>>(),
        [0]
    );
    // The second bracket resolves to Jones only: the search window starts
    // after the first resolved reference, so Smith cannot leak in.
    assert_eq!(
        references[1].1.entries.iter().map(|e| e.0).collect::<Vec<_>>(),
        [1]
    );
}

#[test]
fn linking_twice_is_idempotent_per_fresh_tree() {
    let (blocks, bibliography) = numeric_document();

    let mut first_tree = build_tree(&blocks);
    let first = link_citations(&mut first_tree, &bibliography, &LinkConfig::default()).unwrap();
    let mut second_tree = build_tree(&blocks);
    let second = link_citations(&mut second_tree, &bibliography, &LinkConfig::default()).unwrap();

    assert_eq!(first.stats, second.stats);
    assert_eq!(
        first_tree.all_references().len(),
        second_tree.all_references().len()
    );
}

#[test]
fn empty_bibliography_resolves_nothing() {
    let (blocks, _) = numeric_document();
    let bibliography = Bibliography::new(Vec::new());
    let mut tree = build_tree(&blocks);
    let outcome = link_citations(&mut tree, &bibliography, &LinkConfig::default()).unwrap();
    assert_eq!(outcome.stats.resolved, 0);
    assert!(tree.all_references().is_empty());
}

#[test]
fn tree_flatten_round_trip_preserves_sequence() {
    let (blocks, _) = numeric_document();
    let tree = build_tree(&blocks);
    assert_eq!(tree.flatten(), blocks);
}
