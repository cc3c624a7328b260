//! HTML rendering for the schedule, log, library, history and progress pages

use std::fmt::Write;

use chrono::NaiveDate;

use crate::exercises::{Exercise, MuscleGroup};
use crate::history::{ExerciseProgress, WorkoutDetail};
use crate::schedule::{DaySchedule, Weekday};
use crate::workout::{CurrentWorkout, DATE_FORMAT};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>{title} - liftlog</title>
</head>
<body>
<nav>
<a href=\"/schedule\">Schedule</a> |
<a href=\"/log-workout\">Log workout</a> |
<a href=\"/exercise-library\">Exercise library</a> |
<a href=\"/logs\">Logs</a> |
<a href=\"/progress\">Progress</a>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>
",
        title = escape(title),
    )
}

fn rating_input(name: &str, value: Option<i64>) -> String {
    format!("<input type=\"number\" min=\"1\" max=\"5\" name=\"{name}\" value=\"{}\">", opt(value))
}

pub fn schedule_page(days: &[DaySchedule], library: &[Exercise]) -> String {
    let mut body = String::new();

    for day in days {
        let _ = write!(body, "<section><h2>{}</h2>", day.weekday);
        if day.exercises.is_empty() {
            body.push_str("<p>Rest day</p>");
        } else {
            body.push_str("<ul>");
            for entry in &day.exercises {
                let _ = write!(
                    body,
                    "<li>{} - {} x {}
<form method=\"post\" action=\"/delete_scheduled_exercise\" style=\"display:inline\">
<input type=\"hidden\" name=\"exercise_id\" value=\"{}\">
<input type=\"hidden\" name=\"day_of_week\" value=\"{}\">
<button type=\"submit\">Remove</button>
</form></li>",
                    escape(&entry.exercise_name),
                    entry.sets,
                    entry.reps,
                    entry.exercise_id,
                    day.weekday.index(),
                );
            }
            body.push_str("</ul>");
        }
        body.push_str("</section>");
    }

    body.push_str("<section><h2>Add exercises</h2>\n<form method=\"post\" action=\"/add_exercises_to_schedule\">\n<select name=\"day_of_week\">");
    for weekday in Weekday::DISPLAY_ORDER {
        let _ = write!(body, "<option value=\"{}\">{}</option>", weekday.index(), weekday);
    }
    body.push_str(
        "</select>
<label>Sets <input type=\"number\" min=\"0\" name=\"sets\"></label>
<label>Reps <input type=\"number\" min=\"0\" name=\"reps\"></label>
<ul>",
    );
    for exercise in library {
        let _ = write!(
            body,
            "<li><label><input type=\"checkbox\" name=\"selected_exercises\" value=\"{}\"> {} ({})</label></li>",
            exercise.id,
            escape(&exercise.name),
            escape(&exercise.primary_muscle_group),
        );
    }
    body.push_str("</ul>\n<button type=\"submit\">Add to schedule</button>\n</form></section>");

    layout("Weekly schedule", &body)
}

pub fn log_workout_page(
    workout: &CurrentWorkout,
    workout_date: NaiveDate,
    library: &[Exercise],
    muscle_groups: &[MuscleGroup],
) -> String {
    let mut body = format!(
        "<label>Date <input type=\"date\" id=\"workout-date\" value=\"{}\"></label>",
        workout_date.format(DATE_FORMAT)
    );

    body.push_str("<section><h2>Exercises</h2>");
    for exercise in &workout.exercises {
        let target = match (exercise.target_sets, exercise.target_reps) {
            (Some(sets), Some(reps)) => format!(" (target {sets} x {reps})"),
            _ => String::new(),
        };
        let name = escape(&exercise.exercise_name);
        let _ = write!(
            body,
            "<div class=\"exercise-info\" data-endpoint=\"/update_curr_workout_exercise\" data-key=\"exercise_name\" data-value=\"{name}\">
<p>{name}{target}</p>
<input type=\"number\" step=\"0.5\" min=\"0\" name=\"weight_used\" value=\"{}\">
<input type=\"number\" min=\"0\" name=\"sets_completed\" value=\"{}\">
<input type=\"number\" min=\"0\" name=\"reps_completed\" value=\"{}\">
{}
<textarea name=\"exercise_notes\">{}</textarea>
<form method=\"post\" action=\"/delete_log_exercise\"><input type=\"hidden\" name=\"exercise_name\" value=\"{name}\"><button type=\"submit\">Delete</button></form>
</div>",
            opt(exercise.weight),
            opt(exercise.sets),
            opt(exercise.reps),
            rating_input("difficulty", exercise.difficulty),
            escape(exercise.note.as_deref().unwrap_or_default()),
        );
    }
    body.push_str("</section>");

    body.push_str("<section><h2>Muscle groups</h2>");
    for group in &workout.muscle_groups {
        let name = escape(&group.muscle_group);
        let _ = write!(
            body,
            "<div class=\"muscle-group-info\" data-endpoint=\"/update_curr_workout_muscle_group\" data-key=\"muscle_group_name\" data-value=\"{name}\">
<p>{name}</p>
{}
{}
{}
<textarea name=\"muscle_group_notes\">{}</textarea>
<form method=\"post\" action=\"/delete_log_muscle_group\"><input type=\"hidden\" name=\"muscle_group\" value=\"{name}\"><button type=\"submit\">Delete</button></form>
</div>",
            rating_input("pump_level", group.pump),
            rating_input("pre_workout_soreness", group.soreness_before_workout),
            rating_input("pre_workout_recovery", group.recovery_before_workout),
            escape(group.note.as_deref().unwrap_or_default()),
        );
    }
    body.push_str("</section>");

    body.push_str("<section><h2>Overall</h2>");
    for overall in &workout.overall {
        let _ = write!(
            body,
            "<div class=\"overall-info\" data-endpoint=\"/update_curr_workout_overall\" data-key=\"workout_id\" data-value=\"{id}\">
<input type=\"number\" min=\"0\" name=\"workout_duration\" value=\"{}\">
<input type=\"text\" name=\"workout_type\" value=\"{}\">
{}
{}
<textarea name=\"workout_notes\">{}</textarea>
<form method=\"post\" action=\"/delete_log_overall_workout\"><input type=\"hidden\" name=\"workout_id\" value=\"{id}\"><button type=\"submit\">Delete</button></form>
</div>",
            opt(overall.duration_in_minutes),
            escape(overall.workout_type.as_deref().unwrap_or_default()),
            rating_input("performance_rating", overall.performance),
            rating_input("fatigue_induced", overall.fatigue_induced),
            escape(overall.note.as_deref().unwrap_or_default()),
            id = overall.workout_id,
        );
    }
    body.push_str(
        "<form method=\"post\" action=\"/add_overall_to_log\"><button type=\"submit\">Add overall record</button></form></section>",
    );

    body.push_str("<section><h2>Add from library</h2>\n<form method=\"post\" action=\"/add_exercises_to_log\"><table>");
    for exercise in library {
        let _ = write!(
            body,
            "<tr><td><label><input type=\"checkbox\" name=\"selected_exercises\" value=\"{id}\"> {}</label>
<input type=\"hidden\" name=\"exercise_id\" value=\"{id}\"></td>
<td><input type=\"number\" step=\"0.5\" min=\"0\" name=\"weight\"></td>
<td><input type=\"number\" min=\"0\" name=\"sets\"></td>
<td><input type=\"number\" min=\"0\" name=\"reps\"></td></tr>",
            escape(&exercise.name),
            id = exercise.id,
        );
    }
    body.push_str("</table><button type=\"submit\">Add exercises</button></form>");

    body.push_str("<form method=\"post\" action=\"/add_muscle_group_to_log\"><ul>");
    for group in muscle_groups {
        let name = escape(&group.name);
        let _ = write!(
            body,
            "<li><label><input type=\"checkbox\" name=\"selected_muscle_groups\" value=\"{name}\"> {name}</label></li>"
        );
    }
    body.push_str(
        "</ul>
<input type=\"number\" min=\"1\" max=\"5\" name=\"pump_level_add\">
<input type=\"number\" min=\"1\" max=\"5\" name=\"pre_workout_soreness_add\">
<input type=\"number\" min=\"1\" max=\"5\" name=\"pre_workout_recovery_add\">
<button type=\"submit\">Add muscle groups</button></form></section>
<form method=\"post\" action=\"/finish_workout\"><button type=\"submit\">Finish workout</button></form>
<form method=\"post\" action=\"/use_scheduled_workout\"><button type=\"submit\">Use scheduled workout</button></form>
<form method=\"post\" action=\"/clear_current_workout\"><button type=\"submit\">Clear</button></form>
<script src=\"/static/log_workout.js\"></script>",
    );

    layout("Log workout", &body)
}

pub fn library_page(library: &[Exercise]) -> String {
    let mut body = String::from("<table><tr><th>Exercise</th><th>Type</th><th>Primary</th><th>Secondary</th></tr>");
    for exercise in library {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&exercise.name),
            escape(&exercise.exercise_type),
            escape(&exercise.primary_muscle_group),
            escape(&exercise.secondary_muscle_groups.join(", ")),
        );
    }
    body.push_str("</table>");
    layout("Exercise library", &body)
}

pub fn logs_page(workouts: &[WorkoutDetail]) -> String {
    if workouts.is_empty() {
        return layout("Workout logs", "<p>No workouts logged yet.</p>");
    }

    let mut body = String::new();
    for workout in workouts {
        let s = &workout.summary;
        let _ = write!(
            body,
            "<article><h2>{} - {}</h2><p>{} min, performance {}/5, fatigue {}/5</p>",
            escape(&s.date),
            escape(&s.workout_type),
            s.duration_in_minutes,
            s.performance,
            s.fatigue_induced,
        );
        if let Some(note) = &s.note {
            let _ = write!(body, "<p><em>{}</em></p>", escape(note));
        }
        body.push_str("<ul>");
        for e in &workout.exercises {
            let _ = write!(
                body,
                "<li>{}: {} x {} @ {} (difficulty {})</li>",
                escape(&e.exercise_name),
                e.sets,
                e.reps,
                e.weight,
                e.difficulty
            );
        }
        body.push_str("</ul><ul>");
        for g in &workout.muscle_groups {
            let _ = write!(
                body,
                "<li>{}: pump {}, soreness {}, recovery {}</li>",
                escape(&g.muscle_group),
                opt(g.pump),
                opt(g.soreness_before_workout),
                opt(g.recovery_before_workout),
            );
        }
        body.push_str("</ul></article>");
    }
    layout("Workout logs", &body)
}

pub fn progress_page(progress: &[ExerciseProgress]) -> String {
    let mut body = String::from(
        "<table><tr><th>Exercise</th><th>Sessions</th><th>Best weight</th><th>Total volume</th><th>Last done</th></tr>",
    );
    for row in progress {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.exercise_name),
            row.sessions,
            row.best_weight,
            row.total_volume,
            escape(&row.last_date),
        );
    }
    body.push_str("</table>");
    layout("Progress", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom's\" & co</b>"), "&lt;b&gt;&quot;Tom&#39;s&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn test_schedule_page_lists_days_and_library() {
        let days = vec![DaySchedule {
            weekday: Weekday::Monday,
            exercises: vec![],
        }];
        let library = vec![Exercise {
            id: 7,
            name: "Dip <weighted>".to_string(),
            exercise_type: "Push".to_string(),
            primary_muscle_group: "Triceps".to_string(),
            secondary_muscle_groups: vec![],
        }];

        let html = schedule_page(&days, &library);
        assert!(html.contains("<h2>Monday</h2>"));
        assert!(html.contains("Rest day"));
        assert!(html.contains("value=\"7\"> Dip &lt;weighted&gt;"));
    }
}
