use std::path::PathBuf;

use gocodeo_llm_api::ChatMessage;
use gocodeo_models::{BuildRequest, TechStack};

use crate::task::BuildTask;

/// Output contract shared by every task
pub const SYSTEM_PROMPT: &str = r#"You are a senior full-stack engineer generating a production-ready Next.js project with TypeScript and Tailwind CSS.

Respond with the complete contents of every file you create or change, each wrapped in a block of this exact form:

<file path="relative/path/to/file.ext">
...file contents...
</file>

Rules:
- Paths are relative to the project root. Never use absolute paths or "..".
- Always emit whole files, never diffs or partial snippets.
- Do not write .env.local; environment variables are provided separately.
- Keep any commentary outside the file blocks short."#;

/// Build the conversation for one task
pub fn messages_for(task: BuildTask, request: &BuildRequest, existing_files: &[PathBuf]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(task_prompt(task, request, existing_files)),
    ]
}

fn task_prompt(task: BuildTask, request: &BuildRequest, existing_files: &[PathBuf]) -> String {
    let mut prompt = format!(
        "Project name: {}\nDescription: {}\nTech stack: {} ({})\n\n",
        request.name,
        request.description,
        request.tech_stack.display_name(),
        request.tech_stack.features(),
    );

    prompt.push_str(&task_instructions(task, request.tech_stack));

    if existing_files.is_empty() {
        prompt.push_str("\n\nThe project directory is empty.");
    } else {
        prompt.push_str("\n\nFiles already generated:\n");
        for path in existing_files {
            prompt.push_str(&format!("- {}\n", path.display()));
        }
        prompt.push_str("Build on these files and re-emit any you modify in full.");
    }

    prompt
}

fn task_instructions(task: BuildTask, stack: TechStack) -> String {
    match task {
        BuildTask::Ui => "Task: scaffold the application and its user interface. \
Create package.json, tsconfig.json, next.config, the Tailwind setup, the App Router layout, \
the landing page and the main pages the description calls for, with reusable components."
            .to_string(),
        BuildTask::Auth => format!("Task: add authentication. {}", auth_instructions(stack)),
        BuildTask::Data => format!("Task: add the data layer. {}", data_instructions(stack)),
    }
}

fn auth_instructions(stack: TechStack) -> &'static str {
    match stack {
        TechStack::NextSupabase => {
            "Use @supabase/ssr with NEXT_PUBLIC_SUPABASE_URL and NEXT_PUBLIC_SUPABASE_ANON_KEY. \
Add browser and server clients, a middleware that refreshes the session, \
sign-in and sign-up pages, and protect the authenticated routes."
        }
        TechStack::NextFirebase => {
            "Use Firebase Authentication with the modular SDK configured from NEXT_PUBLIC_FIREBASE_* variables. \
Add an auth context provider, sign-in and sign-up pages, and guard the authenticated routes."
        }
        TechStack::NextMongoDb => {
            "Use NextAuth.js with a credentials provider backed by the MongoDB users collection. \
Hash passwords with bcrypt, add sign-in and sign-up pages, and protect the authenticated routes."
        }
    }
}

fn data_instructions(stack: TechStack) -> &'static str {
    match stack {
        TechStack::NextSupabase => {
            "Design the PostgreSQL schema as SQL migrations under supabase/migrations with row level security policies, \
generate matching TypeScript types, and wire the pages to read and write through the Supabase client."
        }
        TechStack::NextFirebase => {
            "Model the Firestore collections with typed converters, add Firestore security rules, \
and wire the pages to read and write through Firestore with real-time listeners where useful."
        }
        TechStack::NextMongoDb => {
            "Connect with the official MongoDB driver using MONGODB_URI, define typed models, \
add REST route handlers under app/api for each resource, and wire the pages to them."
        }
    }
}
