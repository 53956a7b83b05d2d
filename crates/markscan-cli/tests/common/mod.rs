//! Fixture project shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const DEADLINE: &str = "2026-02-25T20:59:00+03:00";
pub const ON_TIME: &str = "2026-02-20T12:00:00+03:00";
pub const LATE: &str = "2026-02-26T09:00:00+03:00";

pub fn rubric_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../rubrics/react-rendering-lists.toml")
}

pub const APP: &str = r#"import { useState } from "react";
import CourseCard from "./components/CourseCard";
import { initialCourses } from "./data";

export default function App() {
  const [courses, setCourses] = useState(initialCourses);

  // Replace the course at `index` with the result of `mutator`.
  function mutateCourse(index, mutator) {
    setCourses((prev) => prev.map((c, i) => (i === index ? mutator(c) : c)));
  }

  return (
    <main>
      <h1>Study Buddy</h1>
      {courses.map((course, idx) => (
        <CourseCard
          key={course.id}
          course={course}
          index={idx}
          onMutateCourse={mutateCourse}
        />
      ))}
    </main>
  );
}
"#;

pub const STARTER_APP: &str = r#"import { useState } from "react";
import CourseCard from "./components/CourseCard";
import { initialCourses } from "./data";

export default function App() {
  const [courses, setCourses] = useState(initialCourses);

  /* TODO (Task 1): render the list of courses, e.g.
     courses.map((course, idx) => <CourseCard key={course.id} course={course} index={idx} onMutateCourse={mutateCourse} />)
  */
  return (
    <main>
      <h1>Study Buddy</h1>
      {/* courses.map(...) goes here */}
    </main>
  );
}
"#;

pub const COURSE_CARD: &str = r#"import TaskItem from "./TaskItem";

export default function CourseCard({ course, index, onMutateCourse }) {
  function toggleTask(id) {
    onMutateCourse(index, (c) => ({
      ...c,
      tasks: c.tasks.map((t) => (t.id === id ? { ...t, isDone: !t.isDone } : t)),
    }));
  }

  function deleteTask(id) {
    onMutateCourse(index, (c) => ({
      ...c,
      tasks: c.tasks.filter((t) => t.id !== id),
    }));
  }

  const allDone = course.tasks.length > 0 && course.tasks.every((t) => t.isDone);

  return (
    <article className="course card">
      <h2>{course.title}</h2>
      {allDone && <p className="success">All caught up!</p>}
      {course.tasks.length === 0 && <p className="muted">No tasks yet.</p>}
      <ul>
        {course.tasks.map((task) => (
          <TaskItem key={task.id} task={task} onToggle={toggleTask} onDelete={deleteTask} />
        ))}
      </ul>
    </article>
  );
}
"#;

pub const TASK_ITEM: &str = r#"import DueBadge from "./DueBadge";

export default function TaskItem({ task, onToggle, onDelete }) {
  return (
    <li className="task">
      <label>
        <input
          type="checkbox"
          checked={task.isDone}
          onChange={() => onToggle(task.id)}
        />
        <span className={task.isDone ? "done" : ""}>{task.title}</span>
      </label>
      {!task.isDone && <DueBadge dueDate={task.dueDate} />}
      <button className="ghost" onClick={() => onDelete(task.id)}>
        Delete
      </button>
    </li>
  );
}
"#;

/// TaskItem whose delete button is still the starter stub.
pub const TASK_ITEM_NO_DELETE: &str = r#"import DueBadge from "./DueBadge";

export default function TaskItem({ task, onToggle, onDelete }) {
  return (
    <li className="task">
      <label>
        <input
          type="checkbox"
          checked={task.isDone}
          onChange={() => onToggle(task.id)}
        />
        <span>{task.title}</span>
      </label>
      {!task.isDone && <DueBadge dueDate={task.dueDate} />}
      {/* TODO: onClick={() => onDelete(task.id)} */}
      <button className="ghost">Delete</button>
    </li>
  );
}
"#;

pub const DUE_BADGE: &str = r#"function daysUntil(dateStr) {
  const today = new Date();
  const due = new Date(dateStr);
  return Math.ceil((due - today) / (1000 * 60 * 60 * 24));
}

export default function DueBadge({ dueDate }) {
  const days = daysUntil(dueDate);

  let label;
  if (days < 0) label = "Overdue";
  else if (days === 0) label = "Due today";
  else label = `Due in ${days} days`;

  return <span className="badge">{label}</span>;
}
"#;

/// Write a Vite-style project under `root`. `overrides` replaces or, with
/// `None`, omits individual files (paths relative to `root`).
pub fn write_project(root: &Path, overrides: &[(&str, Option<&str>)]) {
    let defaults = [
        ("package.json", Some(r#"{ "name": "study-buddy", "private": true }"#)),
        ("src/App.jsx", Some(APP)),
        ("src/components/CourseCard.jsx", Some(COURSE_CARD)),
        ("src/components/TaskItem.jsx", Some(TASK_ITEM)),
        ("src/components/DueBadge.jsx", Some(DUE_BADGE)),
    ];

    for (rel, content) in defaults {
        let content = overrides
            .iter()
            .find(|(path, _)| *path == rel)
            .map(|(_, c)| *c)
            .unwrap_or(content);
        if let Some(content) = content {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
    }
    std::fs::create_dir_all(root.join("src")).unwrap();
}
