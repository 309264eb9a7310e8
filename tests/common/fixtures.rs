use prepify::{CorrectAnswer, Paper, PaperBundle, Question, QuestionKind, Settings};

pub fn paper(title: &str) -> Paper {
    Paper {
        title: title.to_string(),
        description: String::new(),
        slug: String::new(),
    }
}

pub fn mcq(order: u32, text: &str, options: &[&str], answer: &str) -> Question {
    Question {
        order,
        kind: QuestionKind::Mcq,
        question_text: text.to_string(),
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        correct_answer: Some(CorrectAnswer::Single(answer.to_string())),
        explanation: None,
    }
}

pub fn mcq_multi(order: u32, text: &str, options: &[&str], answers: &[&str]) -> Question {
    Question {
        correct_answer: Some(CorrectAnswer::Multiple(
            answers.iter().map(|a| a.to_string()).collect(),
        )),
        ..mcq(order, text, options, "")
    }
}

pub fn short_answer(order: u32, text: &str, answer: &str) -> Question {
    Question {
        order,
        kind: QuestionKind::ShortAnswer,
        question_text: text.to_string(),
        options: None,
        correct_answer: Some(CorrectAnswer::Single(answer.to_string())),
        explanation: None,
    }
}

pub fn with_explanation(mut question: Question, explanation: &str) -> Question {
    question.explanation = Some(explanation.to_string());
    question
}

pub fn watermark(template: &str, site_name: &str) -> Settings {
    Settings {
        pdf_watermark_enabled: true,
        pdf_watermark_text: template.to_string(),
        site_name: site_name.to_string(),
    }
}

pub fn bundle(paper: Paper, questions: Vec<Question>) -> PaperBundle {
    PaperBundle {
        paper,
        questions,
        settings: Settings::default(),
    }
}

/// `count` alternating arithmetic questions, enough to span several pages.
pub fn arithmetic_questions(count: u32) -> Vec<Question> {
    (1..=count)
        .map(|n| {
            let sum = (2 * n).to_string();
            if n % 2 == 0 {
                short_answer(n, &format!("What is {} + {}?", n, n), &sum)
            } else {
                let wrong = (2 * n + 1).to_string();
                mcq(n, &format!("What is {} + {}?", n, n), &[&sum, &wrong], &sum)
            }
        })
        .collect()
}
