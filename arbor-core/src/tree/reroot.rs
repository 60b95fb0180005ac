//! In-place re-rooting.

use crate::Result;

use super::{NodeId, Tree};

impl Tree {
    /// Makes `new_root` the root by reversing every parent link on the path
    /// from it to the current root. Both the parent and the children views
    /// are updated, and every children list stays in input order, so
    /// re-rooting back at the old root restores the original structure.
    /// Re-rooting at the current root is a no-op.
    ///
    /// # Errors
    /// Returns [`crate::ArgumentError::UnknownNode`] when `new_root` is not in
    /// the tree; the tree is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// let mut tree = Tree::from_rows([
    ///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
    ///     NodeRow::from((2, Some(1), 1.0, 0.0, 0.0)),
    ///     NodeRow::from((3, Some(2), 2.0, 0.0, 0.0)),
    /// ])?;
    /// tree.reroot(3)?;
    /// assert_eq!(tree.find_root(), 3);
    /// assert_eq!(tree.parent(1)?, Some(2));
    /// assert_eq!(tree.children(3)?, vec![2]);
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    pub fn reroot(&mut self, new_root: NodeId) -> Result<()> {
        let target = self.index_of(new_root)?;
        self.reroot_at(target);
        Ok(())
    }

    pub(crate) fn reroot_at(&mut self, target: usize) {
        if self.parents[target].is_none() {
            return;
        }
        let mut path = vec![target];
        let mut cursor = self.parents[target];
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.parents[parent];
        }
        for pair in path.windows(2) {
            let &[child, parent] = pair else {
                continue;
            };
            self.children[parent].retain(|&existing| existing != child);
            let siblings = &mut self.children[child];
            if let Err(slot) = siblings.binary_search(&parent) {
                siblings.insert(slot, parent);
            }
            self.parents[parent] = Some(child);
        }
        self.parents[target] = None;
    }
}
