//! View tree values consumed by a host renderer
//!
//! Views are produced by the UI builtins while a `ui` slot runs. They are
//! reference-semantic: style application mutates the view in place, and
//! every holder sees it.

use crate::gap_buffer::GapBuffer;
use crate::signal::SignalRef;
use crate::token::Body;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a view
pub type ViewRef = Rc<RefCell<View>>;

/// Optional style properties; unset fields inherit from the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    /// Text colour as RGBA
    pub color: Option<u32>,
    /// Background colour as RGBA
    pub background: Option<u32>,
    pub bold: Option<bool>,
    /// Border edges: "all", "top", "left right", ...
    pub border: Option<String>,
    pub padding: Option<i32>,
    pub gap: Option<i32>,
    /// In cells, 0 = auto
    pub width: Option<i32>,
    /// In cells, 0 = auto
    pub height: Option<i32>,
    /// Expand to the available space
    pub fill: bool,
}

#[derive(Debug)]
pub enum ViewKind {
    Text {
        content: String,
    },
    TextField {
        buffer: GapBuffer,
        on_change: Option<Body>,
        /// Signal that receives the buffer text on commit
        source: Option<SignalRef>,
    },
    TextArea {
        buffer: GapBuffer,
        on_change: Option<Body>,
        source: Option<SignalRef>,
        /// First visible line
        scroll_offset: usize,
        /// Visible height from the last render
        visible_height: usize,
    },
    Button {
        label: String,
        on_click: Option<Body>,
    },
    Texture {
        path: String,
    },
    VStack(Vec<ViewRef>),
    HStack(Vec<ViewRef>),
    Spacer,
}

#[derive(Debug)]
pub struct View {
    pub kind: ViewKind,
    pub style: Style,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            style: Style::default(),
        }
    }

    pub fn into_ref(self) -> ViewRef {
        Rc::new(RefCell::new(self))
    }

    pub fn text(content: impl Into<String>) -> Self {
        View::new(ViewKind::Text {
            content: content.into(),
        })
    }

    pub fn button(label: impl Into<String>, on_click: Option<Body>) -> Self {
        View::new(ViewKind::Button {
            label: label.into(),
            on_click,
        })
    }

    pub fn spacer() -> Self {
        let mut view = View::new(ViewKind::Spacer);
        view.style.fill = true;
        view
    }

    /// Upper-case tag used in debug dumps
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ViewKind::Text { .. } => "TEXT",
            ViewKind::TextField { .. } => "TEXTFIELD",
            ViewKind::TextArea { .. } => "TEXTAREA",
            ViewKind::Button { .. } => "BUTTON",
            ViewKind::Texture { .. } => "TEXTURE",
            ViewKind::VStack(_) => "VSTACK",
            ViewKind::HStack(_) => "HSTACK",
            ViewKind::Spacer => "SPACER",
        }
    }

    /// Child views of a stack; empty for leaves
    pub fn children(&self) -> &[ViewRef] {
        match &self.kind {
            ViewKind::VStack(children) | ViewKind::HStack(children) => children,
            _ => &[],
        }
    }

    /// Editable buffer of a text field or text area
    pub fn buffer(&self) -> Option<&GapBuffer> {
        match &self.kind {
            ViewKind::TextField { buffer, .. } | ViewKind::TextArea { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut GapBuffer> {
        match &mut self.kind {
            ViewKind::TextField { buffer, .. } | ViewKind::TextArea { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Write an editable view's text into its source signal
    ///
    /// Hosts call this when focus leaves the widget. Returns true when a
    /// signal was written.
    pub fn commit_text(&self) -> bool {
        match &self.kind {
            ViewKind::TextField {
                buffer,
                source: Some(signal),
                ..
            }
            | ViewKind::TextArea {
                buffer,
                source: Some(signal),
                ..
            } => {
                signal.borrow_mut().set(Value::from(buffer.text()));
                true
            }
            _ => false,
        }
    }
}
