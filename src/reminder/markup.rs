//! Builds the self-contained HTML document of a reminder modal. The document enables its button
//! after the countdown and posts `{"command":"confirm"}` to the embedding surface when clicked.

use std::fmt::Write;

use super::ModalDocument;

/// Escapes text for use inside element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: var(--font-stack);
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            height: 100vh;
            display: flex;
            justify-content: center;
            align-items: center;
            overflow: hidden;
            position: fixed;
            inset: 0;
            z-index: 999999;
        }
        .reminder-container {
            background: rgba(255, 255, 255, 0.95);
            border-radius: 20px;
            padding: 60px 80px;
            text-align: center;
            box-shadow: 0 25px 50px rgba(0, 0, 0, 0.2);
            max-width: 600px;
            width: 90%;
            animation: slideIn 0.5s ease-out, pulse 2s infinite;
        }
        @keyframes slideIn {
            from { opacity: 0; transform: scale(0.9) translateY(-20px); }
            to { opacity: 1; transform: scale(1) translateY(0); }
        }
        @keyframes pulse {
            0% { transform: scale(1); }
            50% { transform: scale(1.05); }
            100% { transform: scale(1); }
        }
        .title { font-size: 2.5em; color: #333; margin-bottom: 20px; font-weight: 600; }
        .message { font-size: 1.2em; color: #666; line-height: 1.6; margin-bottom: 40px; }
        .confirm-btn {
            background: linear-gradient(135deg, #667eea, #764ba2);
            color: white;
            border: none;
            padding: 15px 40px;
            font-size: 1.1em;
            border-radius: 50px;
            cursor: pointer;
            opacity: 0.5;
            pointer-events: none;
        }
        .confirm-btn.enabled { opacity: 1; pointer-events: auto; }
        .countdown { font-size: 0.9em; color: #999; margin-top: 15px; }
"#;

const SCRIPT: &str = r#"
        const host = typeof acquireVsCodeApi === 'function'
            ? acquireVsCodeApi()
            : { postMessage: (message) => window.parent.postMessage(message, '*') };
        const confirmBtn = document.getElementById('confirmBtn');
        const countdownEl = document.getElementById('countdown');
        const secondsEl = document.getElementById('seconds');
        let countdown = Number(secondsEl.textContent);

        const timer = setInterval(() => {
            countdown--;
            secondsEl.textContent = countdown;
            if (countdown <= 0) {
                clearInterval(timer);
                confirmBtn.classList.add('enabled');
                countdownEl.style.display = 'none';
            }
        }, 1000);

        confirmBtn.addEventListener('click', () => {
            if (confirmBtn.classList.contains('enabled')) {
                host.postMessage({ command: 'confirm' });
            }
        });

        window.addEventListener('beforeunload', (e) => {
            e.preventDefault();
            e.returnValue = '';
        });
        window.focus();

        document.addEventListener('keydown', (e) => {
            e.preventDefault();
            e.stopPropagation();
        }, true);
        document.addEventListener('click', (e) => {
            if (!e.target.closest('.reminder-container')) {
                e.preventDefault();
                e.stopPropagation();
            }
        }, true);
"#;

pub fn render_document(document: &ModalDocument) -> String {
    let texts = document.texts;
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
    <style>
        :root {{ --font-stack: {fonts}; }}{STYLE}    </style>
</head>
<body>
    <div class="reminder-container" data-reminder="{kind}">
        <div class="title">{title}</div>
        <div class="message">{message}</div>
        <button id="confirmBtn" class="confirm-btn">{button}</button>
        <div id="countdown" class="countdown">{wait} <span id="seconds">{seconds}</span> {suffix}</div>
    </div>
    <script>{SCRIPT}    </script>
</body>
</html>
"#,
        lang = escape_html(texts.tag),
        heading = escape_html(texts.modal_heading),
        fonts = texts.font_stack,
        kind = document.kind,
        title = escape_html(document.title()),
        message = escape_html(document.message()),
        button = escape_html(document.button()),
        wait = escape_html(texts.wait_seconds),
        seconds = document.countdown_secs,
        suffix = escape_html(texts.seconds_suffix),
    );
    html
}
