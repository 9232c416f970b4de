use chrono::Utc;

use crate::api::{CoverIds, CoverSize};
use crate::app::{AppContext, LibrisError, Result};
use crate::domain::time::time_ago;
use crate::domain::{
    AuthorSummary, BookSummary, EnrichedChange, ReadIdKind, ReadItem, Shelf, SortOrder,
};
use crate::view::detail::{load_detail, AuthorPreview, BookPreview};
use crate::view::{DetailContent, DetailStatus, DetailTarget, SEARCH_FAILED};

pub async fn search(
    ctx: &AppContext,
    query: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("Nothing to search for");
        return Ok(());
    }

    let results = ctx.client.search_all(query, from, to).await;
    if results.is_total_failure() {
        return Err(LibrisError::Other(SEARCH_FAILED.to_string()));
    }

    match &results.books {
        Ok(page) => {
            println!("Books ({} found)", page.num_found);
            for book in &page.docs {
                print_book(book);
            }
        }
        Err(e) => eprintln!("Book search failed: {}", e),
    }

    println!();
    match &results.authors {
        Ok(page) => {
            println!("Authors ({} found)", page.num_found);
            for author in &page.docs {
                print_author(author);
            }
        }
        Err(e) => eprintln!("Author search failed: {}", e),
    }

    Ok(())
}

pub async fn authors(ctx: &AppContext, query: &str) -> Result<()> {
    let page = ctx.client.search_authors(query).await?;
    if page.is_empty() {
        println!("No authors found");
        return Ok(());
    }
    for author in &page.docs {
        print_author(author);
    }
    Ok(())
}

pub async fn subject(
    ctx: &AppContext,
    name: &str,
    sort: SortOrder,
    limit: Option<usize>,
    overview: bool,
) -> Result<()> {
    if overview {
        let Some(subject) = ctx.client.get_subject_overview(name).await? else {
            println!("No such subject: {}", name);
            return Ok(());
        };

        println!("{} ({} works, {} ebooks)", subject.name, subject.work_count, subject.ebook_count);
        if let Some(peak) = subject.peak_year() {
            println!("  Most editions published in {} ({})", peak.year, peak.count);
        }
        for (label, facets) in [
            ("Authors", &subject.authors),
            ("Related subjects", &subject.subjects),
            ("Places", &subject.places),
            ("People", &subject.people),
        ] {
            if facets.is_empty() {
                continue;
            }
            let names: Vec<_> = facets.iter().take(8).map(|f| f.name.as_str()).collect();
            println!("  {}: {}", label, names.join(", "));
        }
        for work in &subject.works {
            let authors: Vec<_> = work.authors.iter().map(|a| a.name.as_str()).collect();
            println!("  {} - {}", work.title, authors.join(", "));
        }
        return Ok(());
    }

    let books = match limit {
        Some(limit) => ctx.client.get_books_by_subject(name, sort, limit).await,
        None => ctx.client.get_subject_shelf(name, sort).await,
    };
    if books.is_empty() {
        println!("No books found for {}", name);
        return Ok(());
    }
    println!("{} ({})", name, sort.as_str());
    for book in &books {
        print_book(book);
    }
    Ok(())
}

pub async fn book(ctx: &AppContext, key: &str) -> Result<()> {
    let target = DetailTarget::Book(BookSummary {
        key: key.trim().to_string(),
        ..BookSummary::default()
    });
    show_detail(ctx, &target).await
}

pub async fn author(ctx: &AppContext, key: &str) -> Result<()> {
    let target = DetailTarget::Author(AuthorSummary {
        key: crate::api::endpoints::author_id(key).to_string(),
        ..AuthorSummary::default()
    });
    show_detail(ctx, &target).await
}

async fn show_detail(ctx: &AppContext, target: &DetailTarget) -> Result<()> {
    match load_detail(&ctx.client, target).await {
        DetailStatus::Ready(DetailContent::Book(preview)) => print_book_preview(ctx, &preview),
        DetailStatus::Ready(DetailContent::Author(preview)) => print_author_preview(ctx, &preview),
        status => {
            let message = status.message().unwrap_or_default().to_string();
            return Err(LibrisError::Other(message));
        }
    }
    Ok(())
}

fn print_book_preview(ctx: &AppContext, preview: &BookPreview) {
    let details = &preview.details;
    println!("{}", details.title);
    if let Some(author) = &preview.author {
        println!("  by {}", author.name);
    }
    if let Some(date) = &details.first_publish_date {
        println!("  First published {}", date);
    }
    println!(
        "  Cover: {}",
        ctx.covers
            .book(CoverIds::from_id(details.covers.first().copied()), CoverSize::L)
    );
    if let Some(description) = details.description_text() {
        println!("\n{}\n", description.trim());
    }
    if !details.subjects.is_empty() {
        let subjects: Vec<_> = details.subjects.iter().take(10).map(String::as_str).collect();
        println!("  Subjects: {}", subjects.join(", "));
    }

    match (&preview.availability, &preview.availability_error) {
        (Some(item), _) => print_read_item(item),
        (None, Some(message)) => println!("  {}", message),
        (None, None) => println!("  Not available to read online"),
    }

    if !preview.editions.is_empty() {
        println!("\nEditions");
        for edition in &preview.editions {
            let year = edition
                .publish_year
                .first()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "    ".to_string());
            println!("  {} {} ({})", year, edition.title, edition.olid());
        }
    }
}

fn print_author_preview(ctx: &AppContext, preview: &AuthorPreview) {
    let details = &preview.details;
    println!("{}", details.name);
    if let Some(lifespan) = details.lifespan() {
        println!("  {}", lifespan);
    }
    println!(
        "  Photo: {}",
        ctx.covers.author(
            CoverIds {
                olid: Some(&preview.key),
                id: details.photos.first().copied(),
                ..CoverIds::default()
            },
            CoverSize::M,
        )
    );
    println!(
        "\n{}\n",
        details.bio_text().unwrap_or("No biography available.").trim()
    );

    if !preview.works.is_empty() {
        println!("Works");
        for work in &preview.works {
            match work.first_publish_year {
                Some(year) => println!("  {} {}", year, work.title),
                None => println!("       {}", work.title),
            }
        }
    }
}

pub async fn changes(
    ctx: &AppContext,
    limit: Option<usize>,
    offset: usize,
    pages: usize,
) -> Result<()> {
    let mut config = ctx.config.feed.clone();
    if let Some(limit) = limit {
        config.page_size = limit.max(1);
    }
    let mut loader = crate::feed::FeedLoader::new(ctx.client.clone(), &config);

    loader.start_at(offset);
    let mut printed = 0;
    for page in 0..pages.max(1) {
        if page > 0 {
            loader.load_more();
        }
        loader.settle().await;

        let state = loader.state();
        if let Some(message) = state.error() {
            return Err(LibrisError::Other(message.to_string()));
        }
        for change in &state.items()[printed..] {
            print_change(change);
        }
        printed = state.items().len();

        if !state.has_more() {
            println!("No more changes");
            break;
        }
    }
    Ok(())
}

fn print_change(change: &EnrichedChange) {
    let now = Utc::now().naive_utc();
    let when = change
        .change
        .occurred_at()
        .map(|t| time_ago(t, now))
        .unwrap_or_default();
    let subject = match &change.subject {
        Some(subject) => subject.label(),
        None => change
            .change
            .changes
            .first()
            .map(|c| c.key.clone())
            .unwrap_or_default(),
    };

    println!(
        "{:>16}  {:<18} {}  by {}",
        when,
        change.kind_title(),
        subject,
        change.change.editor()
    );
    if !change.change.comment.is_empty() {
        println!("{:>18}{}", "", change.change.comment);
    }
}

pub async fn history(ctx: &AppContext, key: &str) -> Result<()> {
    let entries = ctx.client.get_entity_history(key).await;
    if entries.is_empty() {
        println!("No history available");
        return Ok(());
    }
    for entry in &entries {
        let date = entry
            .created_at()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.created.clone());
        println!(
            "r{:<4} {} {:<14} {}",
            entry.revision,
            date,
            entry.action_title(),
            entry.editor_name()
        );
        if !entry.comment.is_empty() {
            println!("      {}", entry.comment);
        }
    }
    Ok(())
}

pub async fn inside(ctx: &AppContext, identifier: &str, query: &str) -> Result<()> {
    let result = ctx.client.search_inside_book(identifier, query).await?;
    if result.matches.is_empty() {
        println!("No matches for \"{}\"", query.trim());
        return Ok(());
    }
    for hit in &result.matches {
        let page = hit
            .page()
            .map(|p| format!("p.{}", p))
            .unwrap_or_default();
        println!("{:>6}  {}", page, hit.render("[", "]").trim());
    }
    Ok(())
}

pub async fn read(ctx: &AppContext, kind: ReadIdKind, value: &str) -> Result<()> {
    let Some(readability) = ctx.client.get_readability(kind, value).await? else {
        println!("No readable copies for {} {}", kind.as_str(), value);
        return Ok(());
    };
    match readability.best() {
        Some(item) => print_read_item(item),
        None => println!("No readable copies for {} {}", kind.as_str(), value),
    }
    Ok(())
}

fn print_read_item(item: &ReadItem) {
    println!("  {}: {}", item.status.label(), item.item_url);
}

pub async fn lists(ctx: &AppContext, query: &str) -> Result<()> {
    let lists = ctx.client.search_lists(query).await?;
    if lists.is_empty() {
        println!("No lists found");
        return Ok(());
    }
    for list in &lists {
        println!("{} ({} entries)\n  {}", list.name, list.seed_count, list.url);
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, key: &str) -> Result<()> {
    let seeds = ctx.client.get_list_seeds(key).await?;
    if seeds.entries.is_empty() {
        println!("List is empty");
        return Ok(());
    }
    for seed in &seeds.entries {
        let title = if seed.title.is_empty() { &seed.url } else { &seed.title };
        println!("{:?}  {}", seed.kind, title);
    }
    Ok(())
}

pub async fn shelf(ctx: &AppContext, user: &str, shelf: Shelf) -> Result<()> {
    let books = ctx.client.get_user_shelf(user, shelf).await?;
    if books.is_empty() {
        println!("{} has nothing on {}", user, shelf.as_str());
        return Ok(());
    }
    for book in &books {
        print_book(book);
    }
    Ok(())
}

pub fn cover(
    ctx: &AppContext,
    isbn: Option<&str>,
    olid: Option<&str>,
    id: Option<i64>,
    size: Option<CoverSize>,
    author: bool,
) {
    let ids = CoverIds { isbn, olid, id };
    let url = if author {
        ctx.covers.author(ids, size.unwrap_or(CoverSize::M))
    } else {
        ctx.covers.book(ids, size.unwrap_or(CoverSize::L))
    };
    println!("{}", url);
}

fn print_book(book: &BookSummary) {
    let year = book
        .first_publish_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "    ".to_string());
    println!(
        "  {} {} - {}  {}",
        year,
        book.display_title(),
        book.display_authors(),
        book.key
    );
}

fn print_author(author: &AuthorSummary) {
    let top = author
        .top_work
        .as_deref()
        .map(|w| format!(", best known for {}", w))
        .unwrap_or_default();
    println!(
        "  {} ({} works{})  {}",
        author.name, author.work_count, top, author.key
    );
}
