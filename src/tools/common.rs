//! Helpers shared by several tools.

use super::catalog::InToolActionId;
use super::tool::{ToolArgs, ToolEvent};
use crate::document::{Document, EntityPoint};
use crate::editing::selection::Selection;

/// The point under the cursor, if the selection passed along with a pointer
/// event is exactly one valid entity point.
pub fn hover_point(doc: &Document, selection: &Selection) -> Option<EntityPoint> {
    let mut points = selection
        .iter()
        .filter_map(|sr| sr.entity_point())
        .filter(|enp| enp.point != 0 && doc.is_valid_point(*enp));
    let enp = points.next()?;
    points.next().is_none().then_some(enp)
}

/// `Rmb` or `Cancel`.
pub fn is_abort(args: &ToolArgs) -> bool {
    matches!(
        args.event,
        ToolEvent::Action(InToolActionId::Rmb | InToolActionId::Cancel)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::selection::SelectableRef;
    use crate::document::ItemId;

    #[test]
    fn test_hover_needs_exactly_one_point() {
        let doc = Document::new();
        let wrkpl = doc.groups_sorted()[1].1.active_workplane.unwrap();
        let sel: Selection = [SelectableRef::entity(wrkpl, 1)].into();
        assert_eq!(hover_point(&doc, &sel), Some(EntityPoint::new(wrkpl, 1)));

        let sel: Selection = [SelectableRef::entity(wrkpl, 0)].into();
        assert_eq!(hover_point(&doc, &sel), None);

        let sel: Selection = [SelectableRef::entity(ItemId(99), 1)].into();
        assert_eq!(hover_point(&doc, &sel), None);
    }
}
