use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI arguments for gocodeo
#[derive(Parser, Debug)]
#[command(name = "gocodeo")]
#[command(about = "gocodeo - build full-stack SaaS applications with AI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize and build a new SaaS project (scaffold, authentication, data persistence)
    Init(InitArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InitArgs {
    /// Project name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Project description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Project directory (defaults to project name)
    #[arg(long, visible_alias = "dir", value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Tech stack to use (1=Next.js+Supabase, 2=Next.js+Firebase, 3=Next.js+MongoDB)
    #[arg(short = 't', long, value_name = "CHOICE")]
    pub tech_stack: Option<String>,

    /// LLM model to use
    #[arg(short = 'm', long)]
    pub model: Option<String>,
}
