//! Host commands swallowed while a reminder modal is open. This only discourages working past a
//! reminder; it is not a lock.

use super::commands::HostCommand;

pub const INTERCEPTED_COMMANDS: &[&str] = &[
    "workbench.action.files.save",
    "workbench.action.files.saveAs",
    "workbench.action.files.saveAll",
    "workbench.action.openSettings",
    "workbench.action.closeActiveEditor",
    "workbench.action.closeAllEditors",
    "workbench.action.navigateBack",
    "workbench.action.navigateForward",
    "editor.action.formatDocument",
    "editor.action.goToDeclaration",
    "editor.action.goToDefinition",
    "editor.action.referenceSearch.trigger",
    "editor.action.rename",
    "editor.action.sourceAction",
    "editor.action.codeAction",
    "editor.action.quickFix",
    "editor.action.organizeImports",
    "editor.action.clipboardCopyAction",
    "editor.action.clipboardCutAction",
    "editor.action.clipboardPasteAction",
    "search.action.openNewEditor",
    "search.action.openNewEditorToSide",
    "workbench.action.quickOpen",
    "workbench.action.showCommands",
    "workbench.action.terminal.toggleTerminal",
    "workbench.action.terminal.new",
    "workbench.action.tasks.runTask",
    "workbench.action.debug.start",
    "workbench.action.debug.run",
    "workbench.action.debug.stop",
    "workbench.action.debug.restart",
    "workbench.action.debug.continue",
    "workbench.view.explorer",
    "workbench.view.search",
    "workbench.view.scm",
    "workbench.view.debug",
    "workbench.view.extensions",
];

pub fn is_intercepted(command: &HostCommand) -> bool {
    match command {
        HostCommand::Type(_) => true,
        HostCommand::Execute(name) => INTERCEPTED_COMMANDS.contains(&name.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::SurfaceMessage;

    #[test]
    fn typing_and_listed_commands_are_intercepted() {
        assert!(is_intercepted(&HostCommand::Type("let x = 1;".into())));
        assert!(is_intercepted(&HostCommand::Execute(
            "workbench.action.files.save".into()
        )));
        assert!(is_intercepted(&HostCommand::Execute(
            "workbench.view.extensions".into()
        )));
    }

    #[test]
    fn own_actions_and_unlisted_commands_pass() {
        assert!(!is_intercepted(&HostCommand::ResetTimers));
        assert!(!is_intercepted(&HostCommand::ShowStatus));
        assert!(!is_intercepted(&HostCommand::Surface(SurfaceMessage::Confirm)));
        assert!(!is_intercepted(&HostCommand::Execute(
            "workbench.action.zoomIn".into()
        )));
    }
}
