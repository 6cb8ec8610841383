// src/bin/mocktest-cli.rs

//! Terminal client: takes quizzes generated by a running backend and keeps
//! the history in a local JSON file.

use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use dotenvy::dotenv;
use mocktest::{
    history::{view::load_entries, BlobHistory, FileBlobStore, TestHistory},
    models::quiz_request::QuizRequest,
    session::{
        app::{App, AppView},
        HttpQuestionSource, QuizSession, QuizStatus,
    },
};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let api_url = env::var("MOCKTEST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let history_dir = env::var("HISTORY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    let source = HttpQuestionSource::new(reqwest::Client::new(), api_url);
    let history: Arc<dyn TestHistory> = Arc::new(BlobHistory::new(FileBlobStore::new(history_dir)));
    let mut session = QuizSession::new(history.clone());
    let mut app = App::new();
    let mut input = io::stdin().lock();

    loop {
        match app.view() {
            AppView::Login => {
                println!("Welcome to MockTest AI");
                println!("Generate practice tests on any topic in seconds.");
                if read_line(&mut input, "Press Enter to continue")?.is_none() {
                    return Ok(());
                }
                app.continue_to_main();
            }
            AppView::Main => {
                let Some(choice) = read_line(&mut input, "\n[g] Generate test  [h] Previous tests  [q] Quit")? else {
                    return Ok(());
                };
                match choice.as_str() {
                    "g" => run_quiz(&mut session, &source, &mut input).await?,
                    "h" => app.show_history(),
                    "q" => return Ok(()),
                    _ => {}
                }
            }
            AppView::History => {
                show_history(history.as_ref());
                app.back();
            }
        }
    }
}

async fn run_quiz(
    session: &mut QuizSession,
    source: &HttpQuestionSource,
    input: &mut impl BufRead,
) -> io::Result<()> {
    let Some(request) = read_request(input)? else {
        return Ok(());
    };

    if !session.can_request(&request) {
        println!("Exam and topic are required.");
        return Ok(());
    }

    println!("Generating...");
    if let Err(e) = session.generate(request, source).await {
        println!("{}", e);
        return Ok(());
    }
    if session.status() != QuizStatus::Taking {
        println!("{}", session.error().unwrap_or_default());
        return Ok(());
    }

    println!("\nTest: {}", session.request().topic);
    loop {
        if !answer_questions(session, input)? {
            return Ok(());
        }
        match read_line(input, "Submit test? [y/N]")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => break,
            Some(_) => continue,
            None => return Ok(()),
        }
    }

    match session.submit_test() {
        Ok(score) => {
            println!("\nTest Complete!");
            println!("Your Score: {} / {}", score, session.questions().len());
        }
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    }

    if let Some(answer) = read_line(input, "Review answers? [Y/n]")? {
        if !answer.eq_ignore_ascii_case("n") && session.review().is_ok() {
            print_review(session);
        }
    }

    if let Err(e) = session.start_new() {
        tracing::warn!("Could not reset session: {}", e);
    }
    Ok(())
}

fn read_request(input: &mut impl BufRead) -> io::Result<Option<QuizRequest>> {
    let Some(exam) = read_line(input, "Exam* (e.g. UPSC, JEE, CET, GMAT)")? else {
        return Ok(None);
    };
    let Some(topic) = read_line(input, "Topic* (e.g. History of Ancient Rome)")? else {
        return Ok(None);
    };
    let Some(difficulty) = read_line(input, "Difficulty (Easy, Medium, Hard; empty for any)")? else {
        return Ok(None);
    };
    let Some(subjects) = read_line(input, "Subjects")? else {
        return Ok(None);
    };
    let Some(language) = read_line(input, "Language")? else {
        return Ok(None);
    };
    let Some(additional_info) = read_line(input, "Additional details")? else {
        return Ok(None);
    };

    Ok(Some(QuizRequest::from_form(
        exam,
        topic,
        difficulty,
        subjects,
        language,
        additional_info,
    )))
}

/// Walks every question once. Returns `false` on end of input.
fn answer_questions(session: &mut QuizSession, input: &mut impl BufRead) -> io::Result<bool> {
    let questions = session.questions().to_vec();
    for q in &questions {
        println!("\n{}. {}", q.id, q.question);
        for (idx, opt) in q.options.iter().enumerate() {
            let marker = if session.user_answers().get(&q.id) == Some(opt) { "*" } else { " " };
            println!(" {}{}) {}", marker, idx + 1, opt);
        }

        let Some(choice) = read_line(input, "Answer number (Enter to skip)")? else {
            return Ok(false);
        };
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| q.options.get(idx));
        if let Some(option) = picked {
            if let Err(e) = session.select_option(q.id, option.clone()) {
                tracing::warn!("Answer not recorded: {}", e);
            }
        }
    }
    Ok(true)
}

fn print_review(session: &QuizSession) {
    println!("\nReviewing: {}", session.request().topic);
    for outcome in session.outcomes() {
        let mark = if outcome.is_correct { "correct" } else { "wrong" };
        println!("\n{}. {} [{}]", outcome.id, outcome.question, mark);
        println!("   Your Answer: {}", outcome.answer_label());
        println!("   Correct Answer: {}", outcome.correct_answer);
        println!(
            "   Explanation: {}",
            outcome.explanation.as_deref().unwrap_or("No explanation provided.")
        );
    }
}

fn show_history(history: &dyn TestHistory) {
    println!("\nPrevious Tests");
    let entries = match load_entries(history) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Could not read history: {}", e);
            println!("Could not read saved tests.");
            return;
        }
    };

    if entries.is_empty() {
        println!("You have no saved tests from the last 30 days.");
        return;
    }

    for entry in entries {
        println!("\n{} ({})", entry.summary(), entry.date);
        for outcome in &entry.outcomes {
            println!("  {}. {}", outcome.id, outcome.question);
            println!("     Your Answer: {}", outcome.answer_label());
            if !outcome.is_correct {
                println!("     Correct Answer: {}", outcome.correct_answer);
            }
        }
    }
}

/// Prints `label` and reads one trimmed line. `None` at end of input.
fn read_line(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
