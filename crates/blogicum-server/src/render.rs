//! Server-rendered HTML pages.

use chrono::{DateTime, Utc};

use blogicum_core::{
    can_mutate, is_generally_visible, Category, Comment, FeedEntry, Location, Page, Post, User,
};

use crate::error::{login_url, post_url, profile_url};
use crate::forms::{PostForm, ProfileForm};

/// Escape text for use in HTML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain text with line breaks kept.
fn paragraphs(text: &str) -> String {
    escape(text).replace('\n', "<br>\n")
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %B %Y, %H:%M").to_string()
}

fn layout(title: &str, viewer: Option<&User>, content: &str) -> String {
    let account = match viewer {
        Some(user) => format!(
            r#"<a href="/posts/create/">New post</a>
            <a href="{profile}">{username}</a>
            <form method="post" action="/auth/logout/" class="inline">
                <button type="submit">Log out</button>
            </form>"#,
            profile = profile_url(&user.username),
            username = escape(&user.username),
        ),
        None => r#"<a href="/auth/login/">Log in</a>
            <a href="/auth/registration/">Sign up</a>"#
            .to_string(),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Blogicum</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header>
        <nav>
            <a href="/" class="brand">Blogicum</a>
            {account}
        </nav>
    </header>
    <main>
{content}
    </main>
</body>
</html>"##,
        title = escape(title),
    )
}

fn post_meta(post: &Post) -> String {
    let category = match &post.category {
        Some(c) if c.is_published => format!(
            r#" in <a href="/category/{}/">{}</a>"#,
            escape(&c.slug),
            escape(&c.title)
        ),
        Some(c) => format!(" in {}", escape(&c.title)),
        None => String::new(),
    };
    let location = match &post.location {
        Some(l) if l.is_published => format!(" &middot; {}", escape(&l.name)),
        _ => String::new(),
    };

    format!(
        r#"<p class="meta">{date} &middot; <a href="{profile}">@{username}</a>{category}{location}</p>"#,
        date = format_date(post.pub_date),
        profile = profile_url(&post.author.username),
        username = escape(&post.author.username),
    )
}

fn post_card(entry: &FeedEntry) -> String {
    let post = &entry.post;
    let image = post
        .image
        .as_deref()
        .map(|src| format!(r#"<img src="/media/{}" alt="" class="thumb">"#, escape(src)))
        .unwrap_or_default();
    let comments = entry
        .comment_count
        .map(|n| format!(r#"<a href="{}#comments">Comments: {}</a>"#, post_url(post.id), n))
        .unwrap_or_default();
    let badge = if post.is_published {
        ""
    } else {
        r#"<span class="badge">unpublished</span>"#
    };

    format!(
        r#"<article class="post-card">
            {image}
            <h2><a href="{url}">{title}</a> {badge}</h2>
            {meta}
            <p>{excerpt}</p>
            <p>{comments}</p>
        </article>"#,
        url = post_url(post.id),
        title = escape(&post.title),
        meta = post_meta(post),
        excerpt = escape(&post.text.chars().take(300).collect::<String>()),
    )
}

fn feed(page: &Page<FeedEntry>) -> String {
    if page.items.is_empty() {
        return r#"<p class="empty">No posts yet.</p>"#.to_string();
    }
    let cards: String = page
        .items
        .iter()
        .map(post_card)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{cards}\n{}", pagination(page))
}

fn pagination<T>(page: &Page<T>) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }
    let previous = page
        .previous_number()
        .map(|n| format!(r#"<a href="?page=1">&laquo; first</a> <a href="?page={n}">previous</a>"#))
        .unwrap_or_default();
    let next = page
        .next_number()
        .map(|n| format!(r#"<a href="?page={n}">next</a> <a href="?page=last">last &raquo;</a>"#))
        .unwrap_or_default();

    format!(
        r#"<nav class="pagination">{previous} <span>Page {number} of {num_pages}</span> {next}</nav>"#,
        number = page.number,
        num_pages = page.num_pages,
    )
}

pub fn index_page(viewer: Option<&User>, page: &Page<FeedEntry>) -> String {
    layout(
        "Home",
        viewer,
        &format!("<h1>Latest posts</h1>\n{}", feed(page)),
    )
}

pub fn category_page(viewer: Option<&User>, category: &Category, page: &Page<FeedEntry>) -> String {
    layout(
        &category.short_title(),
        viewer,
        &format!(
            r#"<h1>{title}</h1>
            <p class="description">{description}</p>
            {feed}"#,
            title = escape(&category.title),
            description = paragraphs(&category.description),
            feed = feed(page),
        ),
    )
}

pub fn profile_page(
    viewer: Option<&User>,
    profile: &User,
    is_owner: bool,
    page: &Page<FeedEntry>,
) -> String {
    let edit = if is_owner {
        r#"<p><a href="/profile/edit/">Edit profile</a></p>"#
    } else {
        ""
    };

    layout(
        &profile.username,
        viewer,
        &format!(
            r#"<h1>{name}</h1>
            <p class="meta">@{username} &middot; joined {joined}</p>
            {edit}
            {feed}"#,
            name = escape(&profile.display_name()),
            username = escape(&profile.username),
            joined = profile.date_joined.format("%d %B %Y"),
            feed = feed(page),
        ),
    )
}

fn comment_block(viewer: Option<&User>, comment: &Comment) -> String {
    let actions = if can_mutate(viewer.map(|u| u.id), comment) {
        format!(
            r#"<a href="/posts/{post}/edit_comment/{id}/">Edit</a>
            <a href="/posts/{post}/delete_comment/{id}/">Delete</a>"#,
            post = comment.post_id.0,
            id = comment.id.0,
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="comment" id="comment-{id}">
            <p class="meta"><a href="{profile}">@{username}</a> &middot; {date}</p>
            <p>{text}</p>
            {actions}
        </div>"#,
        id = comment.id.0,
        profile = profile_url(&comment.author.username),
        username = escape(&comment.author.username),
        date = format_date(comment.created_at),
        text = paragraphs(&comment.text),
    )
}

pub fn detail_page(
    viewer: Option<&User>,
    post: &Post,
    comments: &[Comment],
    now: DateTime<Utc>,
) -> String {
    let notice = if is_generally_visible(post, now) {
        ""
    } else {
        r#"<p class="notice">Only you can see this post: it is unpublished, scheduled, or in a hidden category.</p>"#
    };
    let image = post
        .image
        .as_deref()
        .map(|src| format!(r#"<img src="/media/{}" alt="" class="cover">"#, escape(src)))
        .unwrap_or_default();
    let actions = if can_mutate(viewer.map(|u| u.id), post) {
        format!(
            r#"<p class="actions"><a href="/posts/{id}/edit/">Edit</a> <a href="/posts/{id}/delete/">Delete</a></p>"#,
            id = post.id.0
        )
    } else {
        String::new()
    };
    let comment_form = match viewer {
        Some(_) => comment_form(&format!("/posts/{}/comment/", post.id.0), "", None),
        None => format!(
            r#"<p><a href="{}">Log in</a> to leave a comment.</p>"#,
            login_url(&post_url(post.id))
        ),
    };
    let comment_list: String = comments
        .iter()
        .map(|c| comment_block(viewer, c))
        .collect::<Vec<_>>()
        .join("\n");

    layout(
        &post.short_title(),
        viewer,
        &format!(
            r#"<article class="post">
            {notice}
            <h1>{title}</h1>
            {meta}
            {image}
            <div class="text">{text}</div>
            {actions}
        </article>
        <section id="comments">
            <h2>Comments ({count})</h2>
            {comment_list}
            {comment_form}
        </section>"#,
            title = escape(&post.title),
            meta = post_meta(post),
            text = paragraphs(&post.text),
            count = comments.len(),
        ),
    )
}

fn error_line(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

fn options(
    selected: &str,
    items: impl Iterator<Item = (i64, String)>,
    empty_label: Option<&str>,
) -> String {
    let mut out = empty_label
        .map(|label| format!(r#"<option value="">{}</option>"#, escape(label)))
        .unwrap_or_default();
    for (id, label) in items {
        let id = id.to_string();
        let mark = if id == selected { " selected" } else { "" };
        out.push_str(&format!(
            r#"<option value="{id}"{mark}>{}</option>"#,
            escape(&label)
        ));
    }
    out
}

pub fn post_form_page(
    viewer: Option<&User>,
    heading: &str,
    action: &str,
    form: &PostForm,
    categories: &[Category],
    locations: &[Location],
    error: Option<&str>,
) -> String {
    let category_options = options(
        &form.category,
        categories.iter().map(|c| (c.id.0, c.short_title())),
        Some("---------"),
    );
    let location_options = options(
        &form.location,
        locations.iter().map(|l| (l.id.0, l.short_name())),
        Some("---------"),
    );
    let checked = if form.is_published() { " checked" } else { "" };

    layout(
        heading,
        viewer,
        &format!(
            r#"<h1>{heading}</h1>
            {error}
            <form method="post" action="{action}">
                <label>Title <input type="text" name="title" maxlength="256" required value="{title}"></label>
                <label>Text <textarea name="text" rows="10" required>{text}</textarea></label>
                <label>Publication date <input type="datetime-local" name="pub_date" required value="{pub_date}"></label>
                <small>Set a date in the future to schedule the post.</small>
                <label>Category <select name="category" required>{category_options}</select></label>
                <label>Location <select name="location">{location_options}</select></label>
                <label>Image <input type="text" name="image" value="{image}" placeholder="posts_images/photo.jpg"></label>
                <label><input type="checkbox" name="is_published"{checked}> Published</label>
                <small>Untick to hide the post.</small>
                <button type="submit">Save</button>
            </form>"#,
            heading = escape(heading),
            error = error_line(error),
            action = escape(action),
            title = escape(&form.title),
            text = escape(&form.text),
            pub_date = escape(&form.pub_date),
            image = escape(&form.image),
        ),
    )
}

pub fn delete_post_page(viewer: Option<&User>, post: &Post) -> String {
    layout(
        "Delete post",
        viewer,
        &format!(
            r#"<h1>Delete post</h1>
            <article class="post">
                <h2>{title}</h2>
                {meta}
                <div class="text">{text}</div>
            </article>
            <form method="post" action="/posts/{id}/delete/">
                <button type="submit" class="danger">Delete</button>
                <a href="{url}">Cancel</a>
            </form>"#,
            title = escape(&post.title),
            meta = post_meta(post),
            text = paragraphs(&post.text),
            id = post.id.0,
            url = post_url(post.id),
        ),
    )
}

fn comment_form(action: &str, text: &str, error: Option<&str>) -> String {
    format!(
        r#"<form method="post" action="{action}" class="comment-form">
            {error}
            <textarea name="text" cols="10" rows="5" required>{text}</textarea>
            <button type="submit">Send</button>
        </form>"#,
        action = escape(action),
        error = error_line(error),
        text = escape(text),
    )
}

pub fn comment_form_page(
    viewer: Option<&User>,
    heading: &str,
    action: &str,
    text: &str,
    error: Option<&str>,
) -> String {
    layout(
        heading,
        viewer,
        &format!(
            "<h1>{}</h1>\n{}",
            escape(heading),
            comment_form(action, text, error)
        ),
    )
}

pub fn delete_comment_page(viewer: Option<&User>, comment: &Comment) -> String {
    layout(
        "Delete comment",
        viewer,
        &format!(
            r#"<h1>Delete comment</h1>
            <blockquote>{text}</blockquote>
            <form method="post" action="/posts/{post}/delete_comment/{id}/">
                <button type="submit" class="danger">Delete</button>
                <a href="/posts/{post}/">Cancel</a>
            </form>"#,
            text = paragraphs(&comment.text),
            post = comment.post_id.0,
            id = comment.id.0,
        ),
    )
}

pub fn profile_form_page(viewer: Option<&User>, form: &ProfileForm, error: Option<&str>) -> String {
    layout(
        "Edit profile",
        viewer,
        &format!(
            r#"<h1>Edit profile</h1>
            {error}
            <form method="post" action="/profile/edit/">
                <label>Username <input type="text" name="username" maxlength="150" required value="{username}"></label>
                <label>First name <input type="text" name="first_name" maxlength="150" value="{first_name}"></label>
                <label>Last name <input type="text" name="last_name" maxlength="150" value="{last_name}"></label>
                <label>Email <input type="email" name="email" value="{email}"></label>
                <button type="submit">Save</button>
            </form>"#,
            error = error_line(error),
            username = escape(&form.username),
            first_name = escape(&form.first_name),
            last_name = escape(&form.last_name),
            email = escape(&form.email),
        ),
    )
}

pub fn login_page(viewer: Option<&User>, username: &str, next: &str, error: Option<&str>) -> String {
    layout(
        "Log in",
        viewer,
        &format!(
            r#"<h1>Log in</h1>
            {error}
            <form method="post" action="/auth/login/">
                <input type="hidden" name="next" value="{next}">
                <label>Username <input type="text" name="username" required value="{username}"></label>
                <label>Password <input type="password" name="password" required></label>
                <button type="submit">Log in</button>
            </form>
            <p>No account? <a href="/auth/registration/">Sign up</a></p>"#,
            error = error_line(error),
            next = escape(next),
            username = escape(username),
        ),
    )
}

pub fn registration_page(viewer: Option<&User>, username: &str, error: Option<&str>) -> String {
    layout(
        "Sign up",
        viewer,
        &format!(
            r#"<h1>Sign up</h1>
            {error}
            <form method="post" action="/auth/registration/">
                <label>Username <input type="text" name="username" maxlength="150" required value="{username}"></label>
                <small>Letters, digits and @/./+/-/_ only.</small>
                <label>Password <input type="password" name="password1" required></label>
                <label>Password confirmation <input type="password" name="password2" required></label>
                <button type="submit">Sign up</button>
            </form>"#,
            error = error_line(error),
            username = escape(username),
        ),
    )
}

pub fn not_found_page() -> String {
    layout(
        "Page not found",
        None,
        r#"<h1>404</h1>
        <p>This page does not exist or has been hidden.</p>
        <p><a href="/">Back to the home page</a></p>"#,
    )
}

pub fn server_error_page() -> String {
    layout(
        "Server error",
        None,
        r#"<h1>500</h1>
        <p>Something went wrong on our side. Please try again later.</p>"#,
    )
}
