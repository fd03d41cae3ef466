// ABOUTME: User-facing message texts
// ABOUTME: All Italian strings the bot sends, in one place

use chrono::NaiveDateTime;

use promemoria_core::format_due_date;
use promemoria_tasks::{Task, Urgency};

pub(crate) const WELCOME: &str =
    "Ciao! Sono il tuo bot delle tasks. Usa /help per vedere i comandi disponibili.";

pub(crate) const HELP: &str = "/start - avvia il bot\n\
/help - mostra questo messaggio\n\
/addtask - aggiungi una nuova task\n\
/tasks - mostra le task ancora da fare\n\
/donetask - segna una task come completata\n\
/cancel - annulla l'operazione in corso";

pub(crate) const ASK_TEXT: &str = "Scrivi la descrizione della task:";

pub(crate) const ASK_URGENCY: &str = "Qual è l'urgenza? (bassa / media / alta)";

pub(crate) const URGENCY_RETRY: &str = "Devi scrivere bassa, media o alta.";

pub(crate) const ASK_DUE_DATE: &str = "Quando deve essere completata? (YYYY-MM-DD HH:MM)";

pub(crate) const DUE_DATE_RETRY: &str = "Formato errato. Usa YYYY-MM-DD HH:MM";

pub(crate) const ASK_ID: &str =
    "Scrivi l'ID della task che vuoi segnare come completata. Usa /tasks per vedere gli ID.";

pub(crate) const ID_RETRY: &str = "Devi scrivere un numero valido.";

pub(crate) const NOT_FOUND: &str = "Task non trovata.";

pub(crate) const CANCELLED: &str = "Operazione annullata.";

pub(crate) const NO_TASKS: &str = "Non ci sono task da completare.";

pub(crate) const GENERIC_FAILURE: &str = "Si è verificato un errore, riprova più tardi.";

pub(crate) fn task_added(id: i64, urgency: Urgency, due_at: NaiveDateTime) -> String {
    format!(
        "Task {} aggiunta! Urgenza: {} - scadenza: {}. Ti terrò aggiornato man mano che si avvicina la scadenza.",
        id,
        urgency.label(),
        format_due_date(due_at)
    )
}

pub(crate) fn task_completed(text: &str) -> String {
    format!("✅ Task '{}' segnata come completata.", text)
}

pub(crate) fn reminder(text: &str, due_at: NaiveDateTime) -> String {
    format!("⏰ La tua task '{}' scade alle {}", text, format_due_date(due_at))
}

pub(crate) fn open_tasks(tasks: &[Task]) -> String {
    let mut message = String::from("📋 Task da completare:\n");
    for task in tasks {
        let due = task
            .due_at
            .map(format_due_date)
            .unwrap_or_else(|| "-".to_string());
        message.push_str(&format!(
            "{}. {} - urgenza: {} - scadenza: {}\n",
            task.id,
            task.text,
            task.urgency.label(),
            due
        ));
    }
    message
}
