use super::{Connection, Cursor, Edge, FetchStrategy, PageInfo, Traversal, WindowSpec};
use crate::error::InvalidCursorError;
use tracing::warn;

/// Turns a raw over-fetched window into a `Connection`.
pub struct ConnectionAssembler;

impl ConnectionAssembler {
    /// `get_node` maps a window row to the exposed node, `get_cursor` derives
    /// the edge cursor from that node. The bound check compares the exposed
    /// cursor, not the key the window was sorted by.
    ///
    /// Edges keep the order the store returned them in. For backward
    /// traversal over an ascending key that is descending order.
    pub fn assemble<F, U, T, N, C>(
        window: Vec<U>,
        spec: &WindowSpec<F>,
        get_node: N,
        get_cursor: C,
    ) -> Result<Connection<T>, InvalidCursorError>
    where
        N: FnMut(U) -> T,
        C: Fn(&T) -> Cursor,
    {
        let mut nodes: Vec<T> = window.into_iter().map(get_node).collect();
        let mut page_info = PageInfo::default();

        if let Some(bound) = &spec.bound {
            if spec.strategy == FetchStrategy::StrictValidating {
                let head_matches = nodes
                    .first()
                    .is_some_and(|node| get_cursor(node) == bound.cursor);
                if !head_matches {
                    warn!(
                        cursor = %bound.cursor,
                        "Bound cursor did not lead the re-fetched window"
                    );
                    return Err(InvalidCursorError {
                        provided_cursor: bound.cursor.clone(),
                    });
                }
                nodes.remove(0);
            }
            *bound_side_flag(&mut page_info, spec.traversal) = true;
        }

        if nodes.is_empty() {
            return Ok(Connection::empty());
        }

        let page_size = usize::try_from(spec.page_size).unwrap_or(usize::MAX);
        if nodes.len() > page_size {
            *look_ahead_flag(&mut page_info, spec.traversal) = true;
            nodes.truncate(page_size);
        }

        let edges: Vec<Edge<T>> = nodes
            .into_iter()
            .map(|node| {
                let cursor = get_cursor(&node);
                Edge::new(node, cursor)
            })
            .collect();

        page_info.start_cursor = edges.first().map(|edge| edge.cursor.clone());
        page_info.end_cursor = edges.last().map(|edge| edge.cursor.clone());

        Ok(Connection {
            edges,
            page_info,
            total_count: None,
        })
    }
}

// The page that exists on the cursor's side of the window.
fn bound_side_flag(page_info: &mut PageInfo, traversal: Traversal) -> &mut bool {
    match traversal {
        Traversal::Forward => &mut page_info.has_previous_page,
        Traversal::Backward => &mut page_info.has_next_page,
    }
}

// The page detected by the sentinel row past the end of the window.
fn look_ahead_flag(page_info: &mut PageInfo, traversal: Traversal) -> &mut bool {
    match traversal {
        Traversal::Forward => &mut page_info.has_next_page,
        Traversal::Backward => &mut page_info.has_previous_page,
    }
}
