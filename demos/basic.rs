//! Basic example demonstrating the Agola gateway API client.
//!
//! Run with:
//! ```
//! AGOLA_TOKEN=your-token AGOLA_GATEWAY_URL=http://localhost:8000 cargo run --example basic
//! ```

use agolapi::{AgolaClient, ListOptions, RunFilter, RunPhase};

#[tokio::main]
async fn main() -> agolapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Agola client...");
    let client = AgolaClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List the first page of our own projects
    println!("\n--- Listing Projects (first page) ---");
    let page = client
        .get_current_user_projects(&ListOptions::default().limit(10).ascending())
        .await?;
    println!("Found {} projects ({})", page.data.len(), page.status());

    for project in &page.data.projects {
        println!(
            "  - {} ({})",
            project.path.as_deref().unwrap_or(&project.name),
            project.id
        );
    }

    // Get a specific project (using the first one from the list)
    if let Some(first) = page.data.projects.first() {
        println!("\n--- Getting Project Details ---");
        let project = client.get_project(&first.id).await?.into_data();
        println!("Project: {}", project.name);
        println!("  ID: {}", project.id);
        println!(
            "  Repository: {}",
            project.repository_path.as_deref().unwrap_or("unknown")
        );

        // Recent runs of the project
        println!("\n--- Listing Runs ---");
        let filter = RunFilter::default().group(format!("/project/{}", project.id));
        let runs = client
            .get_runs(&filter, &ListOptions::default().limit(5))
            .await?
            .into_data();
        println!("Found {} runs", runs.runs.len());

        for run in &runs.runs {
            println!("  #{} {} - {} / {}", run.counter, run.name, run.phase, run.result);
        }

        // Show the tasks of the latest run, if it has finished
        if let Some(latest) = runs.runs.first() {
            let run = client.get_run(&latest.id).await?.into_data();
            if run.phase == RunPhase::Finished {
                println!("\n--- Run Tasks ---");
                for task in run.tasks.values() {
                    println!(
                        "  {} [{}]",
                        task.name,
                        task.status.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    // Errors keep the server's message verbatim
    println!("\n--- Error Handling ---");
    match client.get_project("does-not-exist").await {
        Ok(_) => println!("Unexpectedly found project"),
        Err(e) => println!("Expected error: {} (status {:?})", e, e.status()),
    }

    println!("\nDone!");
    Ok(())
}
