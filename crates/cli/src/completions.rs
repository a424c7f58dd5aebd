// SPDX-License-Identifier: MIT

//! Shell completion generation for the heph CLI.
//!
//! ```bash
//! heph completions bash > ~/.local/share/bash-completion/completions/heph
//! heph completions zsh > ~/.zfunc/_heph
//! heph completions fish > ~/.config/fish/completions/heph.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completions and write to stdout.
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "heph", &mut io::stdout());
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
