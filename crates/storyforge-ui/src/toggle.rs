//! A row of mutually-exclusive toggle buttons.

/// One button in a toggle group.
///
/// Descriptors are constructed fresh per render by the caller; the group
/// itself holds no state beyond them.
pub struct ButtonDescriptor {
    /// Unique key within one group.
    pub key: String,

    /// Visible label text.
    pub text: String,

    /// Whether this button is the current selection.
    pub is_active: bool,

    /// Disabled buttons render visible but non-interactive.
    pub disabled: bool,

    on_click: Box<dyn Fn(&str) + Send + Sync>,
}

impl ButtonDescriptor {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            is_active: false,
            disabled: false,
            on_click: Box::new(|_| {}),
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Handler invoked with the button key on click. The caller owns the
    /// selection state and may log a side-channel action here.
    pub fn on_click(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_click = Box::new(handler);
        self
    }
}

impl std::fmt::Debug for ButtonDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonDescriptor")
            .field("key", &self.key)
            .field("text", &self.text)
            .field("is_active", &self.is_active)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Stateless toggle button group: renders one button per descriptor and
/// dispatches clicks to descriptor handlers.
#[derive(Debug)]
pub struct ToggleButtonGroup {
    buttons: Vec<ButtonDescriptor>,
}

impl ToggleButtonGroup {
    /// Create a group. Duplicate keys are a caller bug; the group keeps the
    /// descriptors but warns, since dispatch would only ever reach the first.
    pub fn new(buttons: Vec<ButtonDescriptor>) -> Self {
        for (i, button) in buttons.iter().enumerate() {
            if buttons[..i].iter().any(|b| b.key == button.key) {
                tracing::warn!(key = %button.key, "duplicate toggle button key");
            }
        }

        Self { buttons }
    }

    pub fn buttons(&self) -> &[ButtonDescriptor] {
        &self.buttons
    }

    /// Render the group to HTML. Pure function of the descriptors.
    pub fn render_html(&self) -> String {
        let mut out = String::from("<div class=\"toggle-button-group\" role=\"group\">");

        for button in &self.buttons {
            out.push_str("<button type=\"button\" class=\"toggle-button");
            if button.is_active {
                out.push_str(" is-active");
            }
            out.push_str("\" data-key=\"");
            out.push_str(&escape_attr(&button.key));
            out.push('"');
            if button.disabled {
                out.push_str(" disabled");
            }
            out.push('>');
            out.push_str(&escape_text(&button.text));
            out.push_str("</button>");
        }

        out.push_str("</div>");
        out
    }

    /// Invoke the handler of the enabled button with the given key.
    ///
    /// Returns whether a handler ran; clicks on disabled or unknown buttons
    /// are ignored.
    pub fn click(&self, key: &str) -> bool {
        match self.buttons.iter().find(|b| b.key == key) {
            Some(button) if !button.disabled => {
                (button.on_click)(key);
                true
            }
            _ => false,
        }
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
