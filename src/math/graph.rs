use std::collections::VecDeque;

/// Orders the nodes of a forest so that every node comes after its parent.
///
/// `parent_of(i)` gives the parent of node `i`, which must be a valid index.
/// Roots come first, in index order, followed by their descendants level by
/// level. If some nodes can never be emitted because they sit on (or hang
/// off) a cycle, the smallest such index is returned as the error.
pub fn parents_first<F>(len: usize, parent_of: F) -> Result<Vec<usize>, usize>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut children = vec![vec![]; len];
    let mut roots = VecDeque::new();
    for i in 0..len {
        match parent_of(i) {
            Some(p) => {
                debug_assert!(p < len, "parent {} of node {} out of range", p, i);
                children[p].push(i);
            }
            None => roots.push_back(i),
        }
    }

    // Kahn's algorithm; every node has at most one incoming edge, so a node
    // is ready exactly when its parent has been emitted.
    let mut order = Vec::with_capacity(len);
    let mut queue = roots;
    while let Some(i) = queue.pop_front() {
        order.push(i);
        queue.extend(children[i].iter().copied());
    }

    if order.len() == len {
        return Ok(order);
    }

    let mut emitted = vec![false; len];
    for &i in order.iter() {
        emitted[i] = true;
    }
    let stuck = emitted
        .iter()
        .position(|&e| !e)
        .expect("fewer nodes emitted than exist");
    Err(stuck)
}
