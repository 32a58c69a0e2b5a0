use roster::{DbResult, Event, Gender, Notice, Response, Session, StudentForm};
use tracing_subscriber::EnvFilter;

fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let session = Session::new()?;

    for form in [
        StudentForm::new("Alice", 20, Gender::Female, "Math"),
        StudentForm::new("Bob", 22, Gender::Male, "CS"),
        StudentForm::new("Cara", 21, Gender::Other, "Art"),
        StudentForm::new("", 30, Gender::Male, "History"),
    ] {
        show(session.handle(Event::Add(form))?);
    }

    show(session.handle(Event::View)?);

    let labels = session.selection_labels()?;
    println!("Pick a student: {:?}", labels);

    if let Ok(mut form) = session.prefill(&labels[1])? {
        form.name = "Bobby".to_owned();
        form.course = "CompSci".to_owned();

        show(session.handle(Event::Update {
            selection: labels[1].clone(),
            form,
        })?);
    }

    show(session.handle(Event::Delete {
        selection: labels[0].clone(),
    })?);

    show(session.handle(Event::Search("a".to_owned()))?);
    show(session.handle(Event::Stats)?);

    Ok(())
}

fn show(response: Response) {
    match response.notice {
        Some(Notice::Success(message)) => println!("[ok] {}", message),
        Some(Notice::Info(message)) => println!("[info] {}", message),
        Some(Notice::Warning(message)) => println!("[warn] {}", message),
        Some(Notice::Error(message)) => println!("[error] {}", message),
        None => {}
    }

    for row in &response.rows {
        println!("{}", row);
    }

    for (age, count) in &response.age_distribution {
        println!("{:>3} | {}", age, "#".repeat(*count));
    }
}
