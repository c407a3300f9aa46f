use crate::domain::node::NodePosition;
use crate::domain::section::Line;
use crate::domain::store::RecordStore;
use crate::error::Result;

/// Expands an ordered catalogue of node names into node and section records
/// (§4.1): two nodes per name (positions 1 and 2), and sections formed by
/// pairing consecutive names once forward (`UP`) and once reversed (`DN`).
///
/// Fails (via the store's duplicate checks) on any repeated `(name,
/// position)` or `(from, to, line)` tuple.
pub async fn bootstrap<S: RecordStore>(store: &S, node_names: &[String]) -> Result<()> {
    for name in node_names {
        store.insert_node(name, NodePosition::One).await?;
        store.insert_node(name, NodePosition::Two).await?;
    }

    for pair in node_names.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        link(store, a, b, Line::Up).await?;
        link(store, b, a, Line::Dn).await?;
    }

    log::info!(
        "topology bootstrap complete: {} nodes -> {} node records, {} sections",
        node_names.len(),
        node_names.len() * 2,
        node_names.len().saturating_sub(1) * 2,
    );

    Ok(())
}

async fn link<S: RecordStore>(store: &S, from_name: &str, to_name: &str, line: Line) -> Result<()> {
    let from = store
        .get_node_by_name_position(from_name, NodePosition::Two)
        .await?
        .expect("node was just inserted by bootstrap");
    let to = store
        .get_node_by_name_position(to_name, NodePosition::One)
        .await?
        .expect("node was just inserted by bootstrap");

    store.insert_section(from.id, to.id, from_name, to_name, line).await?;
    Ok(())
}
