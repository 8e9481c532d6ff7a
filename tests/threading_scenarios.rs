mod common;

use mbox_archive::LoadOptions;
use mbox_archive::store::load_from_bytes;
use mbox_archive::threading::{build_thread_graph, walk_forest};

fn list_options() -> LoadOptions {
    LoadOptions {
        list_filter: Some("list@example.com".to_string()),
    }
}

#[test]
fn replies_are_ordered_by_date_with_unparsable_last() {
    let (mut store, stats) = load_from_bytes(common::LIST_MBOX.as_bytes(), &list_options());
    assert_eq!(stats.loaded, 4);
    assert_eq!(stats.filtered, 1);

    let (graph, _) = build_thread_graph(&mut store);
    assert_eq!(
        graph.children("root@example.com"),
        ["reply@example.com".to_string(), "late@example.com".to_string()]
    );
}

#[test]
fn missing_ancestor_becomes_filler_root() {
    let (mut store, _) = load_from_bytes(common::LIST_MBOX.as_bytes(), &list_options());
    let (graph, stats) = build_thread_graph(&mut store);

    assert_eq!(stats.fillers, 1);
    let filler = store.get("missing@example.com").expect("filler synthesized");
    assert!(filler.is_filler());
    assert_eq!(filler.subject, mbox_archive::store::FILLER_SUBJECT);

    assert_eq!(
        graph.roots(),
        ["root@example.com".to_string(), "missing@example.com".to_string()]
    );
    assert_eq!(graph.parent("orphan@example.com"), Some("missing@example.com"));
}

#[test]
fn forest_walk_covers_every_message_once() {
    let (mut store, _) = load_from_bytes(common::LIST_MBOX.as_bytes(), &LoadOptions::default());
    let (graph, _) = build_thread_graph(&mut store);

    let walked: Vec<(String, usize)> = walk_forest(&graph)
        .into_iter()
        .map(|entry| (entry.message_id, entry.depth))
        .collect();
    assert_eq!(walked.len(), store.len());

    let expected = [
        ("root@example.com", 0),
        ("reply@example.com", 1),
        ("late@example.com", 1),
        ("missing@example.com", 0),
        ("orphan@example.com", 1),
        ("private@example.com", 0),
    ];
    let expected: Vec<(String, usize)> = expected
        .iter()
        .map(|(id, depth)| (id.to_string(), *depth))
        .collect();
    assert_eq!(walked, expected);
}

#[test]
fn mutual_in_reply_to_does_not_lose_messages() {
    let mbox = concat!(
        "From a Wed Jan  1 09:00:00 2020\n",
        "Message-ID: <a@x>\n",
        "In-Reply-To: <b@x>\n",
        "Date: Wed, 1 Jan 2020 09:00:00 +0000\n",
        "\n",
        "a\n",
        "\n",
        "From b Wed Jan  1 09:00:00 2020\n",
        "Message-ID: <b@x>\n",
        "In-Reply-To: <a@x>\n",
        "Date: Thu, 2 Jan 2020 09:00:00 +0000\n",
        "\n",
        "b\n",
    );
    let (mut store, _) = load_from_bytes(mbox.as_bytes(), &LoadOptions::default());
    let (graph, stats) = build_thread_graph(&mut store);

    assert_eq!(stats.cycles_broken, 1);
    assert_eq!(walk_forest(&graph).len(), 2);
    assert_eq!(graph.roots(), ["a@x".to_string()]);
}
