//! Drive the core the way the server does: parse a submitted intent, apply
//! it to the list and the session, and check the resulting state.

use todo_core::{
    sign_in, sort_by_text, Credentials, Intent, SessionData, TodoError, TodoList, TodoPatch,
};

const NOW: i64 = 1_700_000_000_000;

fn apply(
    list: &mut TodoList,
    session: &mut SessionData,
    intent: &str,
    text: Option<&str>,
) -> Result<(), TodoError> {
    match intent.parse::<Intent>().expect("valid intent") {
        Intent::Add => {
            list.create(text, NOW)?;
        }
        Intent::Edit(id) => {
            list.get(id).ok_or(TodoError::NotFound(id))?;
            session.start_edit(id);
        }
        Intent::CancelEdit => session.stop_edit(),
        Intent::Update(id) => {
            list.update(id, &TodoPatch::text(text.unwrap_or_default()))?;
            session.stop_edit();
        }
        Intent::Toggle(id) => {
            list.toggle_done(id)?;
        }
        Intent::Delete(id) => {
            list.delete(id)?;
        }
        other => panic!("unexpected intent {other:?}"),
    }
    Ok(())
}

#[test]
fn todo_lifecycle() {
    let mut list = TodoList::new();
    let mut session = SessionData::default();

    // Step 1: short text is refused, nothing stored.
    let err = apply(&mut list, &mut session, "add", Some("ab")).unwrap_err();
    assert!(matches!(err, TodoError::Validation { .. }));
    assert!(list.is_empty());

    // Step 2: add two todos.
    apply(&mut list, &mut session, "add", Some("walk dog")).unwrap();
    apply(&mut list, &mut session, "add", Some("Buy milk")).unwrap();
    let mut todos = list.todos().to_vec();
    sort_by_text(&mut todos);
    assert_eq!(todos[0].text, "Buy milk");
    assert_eq!(todos[1].text, "walk dog");
    let id = todos[1].id;

    // Step 3: edit, then update the text.
    apply(&mut list, &mut session, &format!("edit-{id}"), None).unwrap();
    assert_eq!(session.edit_cursor(), id);
    apply(&mut list, &mut session, &format!("update-{id}"), Some("walk cat")).unwrap();
    assert_eq!(session.edit_cursor(), -1);
    assert_eq!(list.get(id).unwrap().text, "walk cat");

    // Step 4: edit then cancel leaves the text alone.
    apply(&mut list, &mut session, &format!("edit-{id}"), None).unwrap();
    apply(&mut list, &mut session, "edit--1", None).unwrap();
    assert_eq!(session.edit_id, None);

    // Step 5: toggle keeps the text.
    apply(&mut list, &mut session, &format!("toggle-{id}"), None).unwrap();
    let todo = list.get(id).unwrap();
    assert!(todo.done);
    assert_eq!(todo.text, "walk cat");

    // Step 6: delete, then delete again.
    apply(&mut list, &mut session, &format!("delete-{id}"), None).unwrap();
    let err = apply(&mut list, &mut session, &format!("delete-{id}"), None).unwrap_err();
    assert_eq!(err, TodoError::NotFound(id));
    assert_eq!(list.len(), 1);
}

#[test]
fn sign_in_then_out() {
    let mut session = SessionData::default();
    assert!(session.is_anonymous());

    let username = sign_in(Some("username"), Some("password"), &Credentials::default()).unwrap();
    session.sign_in(username);
    assert_eq!(session.current_user(), "username");

    session.sign_out();
    assert_eq!(session.current_user(), "");
}
