use serde::{Deserialize, Serialize};

/// A single, stateless DOM instruction.
///
/// The core emits a `Vec<Effect>` for every handled event. The bridge applies
/// the list in order; each effect carries all the data it needs. Effects whose
/// target no longer resolves are skipped by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// `classList.add(class)`.
    AddClass { target: Target, class: String },

    /// `classList.remove(class)`.
    RemoveClass { target: Target, class: String },

    SetAttribute {
        target: Target,
        name: String,
        value: String,
    },

    /// Toggle the `hidden` property of an element.
    SetHidden { target: Target, hidden: bool },

    /// Replace the text content of an element.
    SetText { target: Target, text: String },

    /// Append to the current text content of an element.
    AppendText { target: Target, text: String },

    /// `style.setProperty(property, value)`. Used for both regular
    /// properties (`transform`) and custom properties (`--px`).
    SetStyle {
        target: Target,
        property: String,
        value: String,
    },

    /// Swap the `src` of an image.
    SetSource { target: Target, src: String },

    /// Detach an element from the document.
    Remove { target: Target },

    /// Stop watching an element for viewport intersection.
    Unobserve { target: Target },

    /// Scroll the window to the very top.
    ScrollToTop { behavior: ScrollBehavior },

    /// Scroll an element into view, aligned to the top of the viewport.
    ScrollIntoView {
        target: Target,
        behavior: ScrollBehavior,
    },

    /// Open a prefilled mail draft. Subject and body are raw text; the
    /// bridge percent-encodes them into the `mailto:` URL.
    ComposeMail {
        recipient: String,
        subject: String,
        body: String,
    },

    /// Reload the current page.
    Reload,

    /// Write text to the system clipboard. The bridge reports the outcome
    /// back for the same copy button.
    WriteClipboard { button: usize, text: String },

    /// Fire `timer` after `delay_ms`.
    Schedule { delay_ms: u32, timer: TimerKind },
}

/// Which element an effect applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// The document root (`<html>`).
    Root,
    /// A single element looked up by id.
    Id(String),
    /// The `index`-th element of a discovered group, in document order.
    Node { group: NodeGroup, index: usize },
}

impl Target {
    pub fn id(id: impl Into<String>) -> Self {
        Target::Id(id.into())
    }

    pub fn node(group: NodeGroup, index: usize) -> Self {
        Target::Node { group, index }
    }
}

/// Element groups the bridge discovers by selector at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeGroup {
    Reveal,
    ExperienceCard,
    /// The timeline dot inside the experience card with the same index.
    TimelineDot,
    Tilt,
    Image,
    CopyButton,
    BackgroundLayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

impl ScrollBehavior {
    /// Smooth unless the user asked for reduced motion.
    pub fn for_motion(reduced_motion: bool) -> Self {
        if reduced_motion {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        }
    }
}

/// Deferred callbacks the core asks the bridge to run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Advance the typewriter by one step.
    Typewriter,
    /// Restore the label of a copy button.
    CopyRestore { button: usize },
}
