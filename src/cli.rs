use colored::{ColoredString, Colorize};
use log::debug;
use speakingmock::{Category, Error, ImageSet, QuestionRecord, SpeakingTest};
use text_io::try_read;

#[derive(Debug, PartialEq)]
pub enum Choice {
    Next,
    Previous,
    Jump(u32),
    Stay,
    Quit,
}

impl Choice {
    pub fn from_str(question_count: usize, input: &str) -> Choice {
        match input.trim() {
            "" | "n" => Choice::Next,
            "p" => Choice::Previous,
            "q" => Choice::Quit,
            input => match input.parse::<u32>() {
                Ok(num) if num >= 1 && num as usize <= question_count => Choice::Jump(num),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} questions!", question_count).bright_red()
                    );
                    Choice::Stay
                }
                Err(_) => Choice::Stay,
            },
        }
    }
}

fn highlight(text: &str, category: Category) -> ColoredString {
    match category {
        Category::Adverb => text.cyan(),
        Category::Collocation => text.green(),
        Category::PhrasalVerb => text.yellow(),
        Category::Proverb => text.magenta().italic(),
        Category::Idiom => text.blue().bold(),
    }
}

fn legend() -> String {
    Category::ALL
        .iter()
        .map(|c| highlight(&c.to_string(), *c).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything shown for one question, ready to print.
pub fn render_question(
    question: &QuestionRecord,
    images: Option<&ImageSet>,
    question_count: usize,
) -> Result<String, Error> {
    macro_rules! push_line {
        ($out:expr) => {
            $out.push('\n')
        };
        ($out:expr, $($arg:tt)*) => {{
            $out.push_str(&format!($($arg)*));
            $out.push('\n');
        }};
    }

    let mut out = String::new();
    let leading = format!("{}/{}. ", question.number, question_count);
    let indent = " ".repeat(leading.chars().count());

    push_line!(
        out,
        "{}{}",
        leading.cyan(),
        format!(" {} · {} ", question.part, question.badge)
            .black()
            .bold()
            .on_white()
    );
    push_line!(
        out,
        "{}{}",
        indent,
        format!(
            "Preparation {}s, speaking {}s",
            question.prep_time, question.speak_time
        )
        .dimmed()
    );
    push_line!(out, "{}{}", indent, question.prompt.bold());
    if let Some(instruction) = &question.prompt_instruction {
        push_line!(out, "{}{}", indent, instruction.italic());
    }

    if let Some(images) = images {
        for (i, (url, caption)) in images.pairs().iter().enumerate() {
            push_line!(out, "{}{}. {} ({})", indent, i + 1, caption, url.underline());
        }
    }

    for point in question.bullet_points() {
        push_line!(out, "{}• {}", indent, point);
    }

    if let Some(debate) = question.debate_points() {
        push_line!(out, "{}{}", indent, "For:".green().bold());
        for point in &debate.for_points {
            push_line!(out, "{}  + {}", indent, point);
        }
        push_line!(out, "{}{}", indent, "Against:".red().bold());
        for point in &debate.against {
            push_line!(out, "{}  - {}", indent, point);
        }
    }

    let annotated = question.annotated_answer()?;
    let mut answer = String::with_capacity(annotated.text.len());
    let mut cursor = 0;
    for span in &annotated.spans {
        answer.push_str(&annotated.text[cursor..span.range.start]);
        answer.push_str(&highlight(annotated.span_text(span), span.category).to_string());
        cursor = span.range.end;
    }
    answer.push_str(&annotated.text[cursor..]);

    push_line!(out);
    push_line!(out, "{}{}", indent, "Sample answer".cyan().bold());
    for paragraph in answer.split("\n\n") {
        push_line!(out, "{}{}", indent, paragraph.replace('\n', " "));
        push_line!(out);
    }
    push_line!(out, "{}{}", indent, legend());

    let vocabulary = &question.vocabulary;
    push_line!(out);
    push_line!(out, "{}{}", indent, vocabulary.title.cyan().bold());
    for (heading, pairs) in [
        ("Sentence starters", vocabulary.sentence_starter_pairs()),
        ("Phrases", vocabulary.phrase_pairs()),
        ("Idioms & quotes", vocabulary.idiom_pairs()),
    ] {
        push_line!(out, "{}{}", indent, heading.underline());
        for pair in pairs {
            let term = if pair.emphasized {
                pair.term.bold()
            } else {
                pair.term.normal()
            };
            match pair.translation {
                Some(translation) => {
                    push_line!(out, "{}  {} - {}", indent, term, translation.dimmed());
                }
                None => {
                    push_line!(out, "{}  {}", indent, term);
                }
            }
        }
    }

    Ok(out)
}

pub fn print_question(test: &SpeakingTest, number: u32) -> Result<(), Error> {
    let question = test.question_by_number(number)?;
    print!(
        "{}",
        render_question(question, test.images_for(question), test.len())?
    );
    Ok(())
}

pub fn browse_loop(test: &SpeakingTest, start: u32) -> Result<(), Error> {
    let question_count = test.len();
    let mut current = start;

    loop {
        print_question(test, current)?;

        print!(
            "{} ",
            "Enter/n for next, p for previous, a number to jump, q to quit:".cyan()
        );
        let line: Result<String, _> = try_read!("{}\n");
        let choice = match line {
            Ok(line) => Choice::from_str(question_count, &line),
            Err(_) => Choice::Quit,
        };
        debug!("choice: {:?}", choice);

        match choice {
            Choice::Next => {
                if current as usize >= question_count {
                    println!("{}", "That was the last question!".cyan());
                    return Ok(());
                }
                current += 1;
            }
            Choice::Previous => current = current.saturating_sub(1).max(1),
            Choice::Jump(num) => current = num,
            Choice::Stay => {}
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return Ok(());
            }
        }
    }
}
