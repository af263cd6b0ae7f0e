//! The editing session: one document, its history and at most one running
//! tool.
//!
//! `Core` is the only owner of a `ToolInstance`. Every tool call gets a
//! fresh `ToolContext` borrowing the document and the editor interface, and
//! the response decides what happens to the document afterwards:
//!
//! 1. **Nop**: the tool keeps running
//! 2. **Commit**: a snapshot is pushed onto the history under the tool's
//!    catalog name
//! 3. **Revert** (and failures): the document goes back to the last snapshot
//! 4. **End**: the tool is done without an undo step; anything it changed is
//!    discarded
//!
//! So whenever no tool is active, the document equals the live history entry.

use bevy::log::{debug, info, warn};
use bevy::prelude::Event;
use std::path::{Path, PathBuf};

use super::errors::{anyhow, SketchResult, ToolError};
use super::settings::Settings;
use crate::document::{Document, ItemId};
use crate::editing::history::DocumentHistory;
use crate::editing::selection::Selection;
use crate::tools::catalog::{catalog_item, ActionId, ActionToolId};
use crate::tools::context::{EditorInterface, ToolContext, ToolView};
use crate::tools::instance::ToolInstance;
use crate::tools::tool::{CanBegin, ToolArgs, ToolFlags, ToolResponse};
use crate::tools::tool_id::ToolId;

/// What `tool_can_begin` tells the UI about a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanBeginInfo {
    pub can_begin: CanBegin,
    /// The tool only makes sense for the current selection, so menus offer
    /// it prominently.
    pub is_specific: bool,
}

/// Requests from the front end to the session.
#[derive(Event, Debug, Clone)]
pub enum EditorRequest {
    BeginTool {
        tool: ToolId,
        args: ToolArgs,
        /// Started by a drag; the tool ends when the button is released.
        transient: bool,
    },
    Update(ToolArgs),
    Cancel,
    Action(ActionId),
}

/// Things that happened during the last calls, drained by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// The active tool changed; `None` once it finished.
    ToolChanged(Option<ToolId>),
    /// The document was replaced or committed; `groups` had pending work.
    Rebuilt { comment: String, groups: Vec<ItemId> },
}

pub struct Core {
    doc: Document,
    history: DocumentHistory,
    current_group: ItemId,
    path: Option<PathBuf>,
    needs_save: bool,
    tool: Option<ToolInstance>,
    intf: Box<dyn EditorInterface>,
    events: Vec<CoreEvent>,
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("current_group", &self.current_group)
            .field("path", &self.path)
            .field("needs_save", &self.needs_save)
            .field("tool", &self.tool)
            .finish()
    }
}

/// The last group in build order; every document has at least one.
fn last_group(doc: &Document) -> ItemId {
    doc.groups_sorted()
        .last()
        .map_or(ItemId(0), |(id, _)| *id)
}

impl Core {
    /// A session on a new, unsaved document.
    pub fn new(settings: &Settings, intf: Box<dyn EditorInterface>) -> Self {
        Self::with_document(Document::new(), None, settings, intf)
    }

    pub fn open(
        path: impl AsRef<Path>,
        settings: &Settings,
        intf: Box<dyn EditorInterface>,
    ) -> SketchResult<Self> {
        let path = path.as_ref();
        let doc = Document::load_from_file(path)?;
        if doc.is_read_only() {
            warn!(
                "{} was written by a newer version and is read-only",
                path.display()
            );
        }
        info!("Opened {}", path.display());
        Ok(Self::with_document(
            doc,
            Some(path.to_path_buf()),
            settings,
            intf,
        ))
    }

    fn with_document(
        mut doc: Document,
        path: Option<PathBuf>,
        settings: &Settings,
        intf: Box<dyn EditorInterface>,
    ) -> Self {
        doc.take_pending();
        let history = DocumentHistory::new(&doc, settings.undo_depth);
        let current_group = last_group(&doc);
        Self {
            doc,
            history,
            current_group,
            path,
            needs_save: false,
            tool: None,
            intf,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn history(&self) -> &DocumentHistory {
        &self.history
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn current_group(&self) -> ItemId {
        self.current_group
    }

    /// The workplane 2D tools of the current group draw in.
    pub fn current_workplane(&self) -> Option<ItemId> {
        self.doc
            .group(self.current_group)
            .and_then(|g| g.active_workplane)
    }

    pub fn set_current_group(&mut self, group: ItemId) -> Result<(), ToolError> {
        if let Some(tool) = &self.tool {
            return Err(ToolError::ToolActive(tool.id()));
        }
        if !self.doc.contains_group(group) {
            return Err(anyhow!("group {group} does not exist").into());
        }
        self.current_group = group;
        Ok(())
    }

    pub fn tool_is_active(&self) -> bool {
        self.tool.is_some()
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        self.tool.as_ref().map(ToolInstance::id)
    }

    /// Takes the events collected since the last call.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn view<'a>(&'a self, selection: &'a Selection) -> ToolView<'a> {
        ToolView {
            doc: &self.doc,
            selection,
            group: self.current_group,
            workplane: self.current_workplane(),
        }
    }

    /// Asks a throwaway instance of `id` whether it could begin now. Has no
    /// effect on the session.
    pub fn tool_can_begin(&self, id: ToolId, selection: &Selection) -> CanBeginInfo {
        let mut instance = ToolInstance::new(id, ToolFlags::empty());
        let is_specific = instance.is_specific();
        let can_begin = if self.doc.is_read_only() {
            CanBegin::No
        } else {
            instance
                .check(&self.view(selection))
                .unwrap_or(CanBegin::No)
        };
        CanBeginInfo {
            can_begin,
            is_specific,
        }
    }

    pub fn tool_begin(
        &mut self,
        id: ToolId,
        args: &ToolArgs,
        transient: bool,
    ) -> Result<ToolResponse, ToolError> {
        if let Some(tool) = &self.tool {
            return Err(ToolError::ToolActive(tool.id()));
        }
        if self.doc.is_read_only() {
            return Err(ToolError::ReadOnly);
        }

        let flags = if transient {
            ToolFlags::TRANSIENT
        } else {
            ToolFlags::empty()
        };
        let mut instance = ToolInstance::new(id, flags);
        let can_begin = instance.check(&self.view(&args.selection))?;
        if !can_begin.is_yes() {
            debug!("Tool {} cannot begin", id);
            return Err(ToolError::CannotBegin(id));
        }

        let group = self.current_group;
        let workplane = self.current_workplane();
        let result = {
            let mut ctx = ToolContext::new(&mut self.doc, group, workplane, self.intf.as_mut());
            instance.begin(&mut ctx, args)
        };
        self.events.push(CoreEvent::ToolChanged(Some(id)));
        self.finish(instance, result)
    }

    pub fn tool_update(&mut self, args: &ToolArgs) -> Result<ToolResponse, ToolError> {
        let Some(mut instance) = self.tool.take() else {
            return Err(ToolError::NoActiveTool);
        };
        let group = self.current_group;
        let workplane = self.current_workplane();
        let result = {
            let mut ctx = ToolContext::new(&mut self.doc, group, workplane, self.intf.as_mut());
            instance.update(&mut ctx, args)
        };
        self.finish(instance, result)
    }

    /// Abandons the active tool and restores the document.
    pub fn tool_cancel(&mut self) -> Result<(), ToolError> {
        let Some(mut instance) = self.tool.take() else {
            return Err(ToolError::NoActiveTool);
        };
        instance.cancel()?;
        self.intf.tool_bar_set_actions(&[]);
        self.intf.tool_bar_set_tool_tip("");
        self.revert(instance.id());
        self.events.push(CoreEvent::ToolChanged(None));
        Ok(())
    }

    fn finish(
        &mut self,
        instance: ToolInstance,
        result: Result<ToolResponse, ToolError>,
    ) -> Result<ToolResponse, ToolError> {
        let id = instance.id();
        match &result {
            Ok(ToolResponse::Nop) => {
                self.tool = Some(instance);
                return result;
            }
            Ok(ToolResponse::Commit) => self.commit(id),
            Ok(ToolResponse::End) => {
                if self.history.last_snapshot() != Some(&self.doc) {
                    warn!("Tool {} ended with uncommitted changes, discarding", id);
                    self.revert(id);
                }
                debug!("Tool {} ended", id);
            }
            Ok(ToolResponse::Revert) | Err(_) => self.revert(id),
        }
        self.intf.tool_bar_set_tool_tip("");
        self.events.push(CoreEvent::ToolChanged(None));
        result
    }

    fn commit(&mut self, id: ToolId) {
        let comment = catalog_item(id).map_or(id.name(), |item| item.name);
        // The snapshot must match the idle document, so pending work is
        // taken before it is recorded.
        let groups = self.doc.take_pending();
        self.history.push(&self.doc, comment);
        self.needs_save = true;
        info!("Committed {}", comment);
        self.announce_rebuild(comment, groups);
    }

    fn revert(&mut self, id: ToolId) {
        if let Some(snapshot) = self.history.last_snapshot() {
            if snapshot != &self.doc {
                self.doc = snapshot.clone();
                debug!("Reverted changes of {}", id);
            }
        }
        self.fix_current_group();
    }

    fn rebuild(&mut self, comment: &str) {
        let groups = self.doc.take_pending();
        self.announce_rebuild(comment, groups);
    }

    fn announce_rebuild(&mut self, comment: &str, groups: Vec<ItemId>) {
        self.fix_current_group();
        self.events.push(CoreEvent::Rebuilt {
            comment: comment.to_string(),
            groups,
        });
    }

    /// Falls back to the last group when the current one went away.
    fn fix_current_group(&mut self) {
        if !self.doc.contains_group(self.current_group) {
            self.current_group = last_group(&self.doc);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<(), ToolError> {
        self.ensure_idle()?;
        let Some((comment, doc)) = self.history.undo() else {
            debug!("Nothing to undo");
            return Ok(());
        };
        self.doc = doc;
        self.needs_save = true;
        info!("Undid {}", comment);
        self.rebuild(&format!("undo {comment}"));
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), ToolError> {
        self.ensure_idle()?;
        let Some((comment, doc)) = self.history.redo() else {
            debug!("Nothing to redo");
            return Ok(());
        };
        self.doc = doc;
        self.needs_save = true;
        info!("Redid {}", comment);
        self.rebuild(&format!("redo {comment}"));
        Ok(())
    }

    pub fn save(&mut self) -> SketchResult<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| anyhow!("document has no file name, use save as"))?;
        self.save_as(path)
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> SketchResult<()> {
        let path = path.as_ref();
        anyhow::ensure!(!self.doc.is_read_only(), "document is read-only");
        if let Some(tool) = &self.tool {
            anyhow::bail!("cannot save while {} is active", tool.id());
        }
        self.doc.save_to_file(path)?;
        self.path = Some(path.to_path_buf());
        self.needs_save = false;
        info!("Saved {}", path.display());
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), ToolError> {
        match &self.tool {
            Some(tool) => Err(ToolError::ToolActive(tool.id())),
            None => Ok(()),
        }
    }

    /// Moves the current group by `step` in build order, clamped to the ends.
    fn step_group(&mut self, step: isize) -> Result<(), ToolError> {
        let groups: Vec<ItemId> = self.doc.groups_sorted().iter().map(|(id, _)| *id).collect();
        let Some(pos) = groups.iter().position(|id| *id == self.current_group) else {
            self.fix_current_group();
            return Ok(());
        };
        let target = pos.saturating_add_signed(step).min(groups.len() - 1);
        self.set_current_group(groups[target])
    }

    pub fn trigger_action(&mut self, action: ActionId) -> Result<(), ToolError> {
        debug!("Action {}", action);
        match action {
            ActionId::Undo => self.undo(),
            ActionId::Redo => self.redo(),
            ActionId::Save => self.save().map_err(ToolError::from),
            ActionId::PreviousGroup => self.step_group(-1),
            ActionId::NextGroup => self.step_group(1),
        }
    }

    /// Starts a tool or runs an action, whichever `id` names.
    pub fn trigger(
        &mut self,
        id: ActionToolId,
        args: &ToolArgs,
    ) -> Result<Option<ToolResponse>, ToolError> {
        match id {
            ActionToolId::Tool(tool) => self.tool_begin(tool, args, false).map(Some),
            ActionToolId::Action(action) => self.trigger_action(action).map(|()| None),
        }
    }

    pub fn handle_request(
        &mut self,
        request: &EditorRequest,
    ) -> Result<Option<ToolResponse>, ToolError> {
        match request {
            EditorRequest::BeginTool {
                tool,
                args,
                transient,
            } => self.tool_begin(*tool, args, *transient).map(Some),
            EditorRequest::Update(args) => self.tool_update(args).map(Some),
            EditorRequest::Cancel => self.tool_cancel().map(|()| None),
            EditorRequest::Action(action) => self.trigger_action(*action).map(|()| None),
        }
    }
}
