//! Exercises 10-14: stash, revert, reset, rebase.

use crate::content::FileEntry;
use crate::scenario::{Scenario, ScenarioBuilder};
use crate::types::ScenarioId;
use crate::vcs::GitOp;

use super::MAIN;

const STASH_FORM: &str = r#"<form id="signup">
    <label for="email">Email</label>
    <input type="email" id="email" name="email">
    <button type="submit">Sign up</button>
</form>
"#;

const STASH_FORM_WIP: &str = r#"<form id="signup">
    <label for="name">Name</label>
    <input type="text" id="name" name="name">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" required>
    <button type="submit">Sign up</button>
</form>
"#;

const STASH_STYLE: &str = "form {
    display: flex;
    flex-direction: column;
}
";

const STASH_STYLE_WIP: &str = "form {
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
    max-width: 20rem;
}
";

const STASH_README: &str = "# 📦 Exercise: putting work aside with git stash

## 🎯 Goal
Switch branches in the middle of unfinished work without committing it.

## 📁 Initial state
- You are on `feature-form`
- `form.html` and `style.css` have uncommitted changes (half-done form)
- An urgent fix is needed on `main`

## 📋 Steps

1. `git status`: two modified files
2. `git stash push -m \"form in progress\"`
3. `git status`: the working tree is clean
4. `git switch main`, fix something, commit, `git switch feature-form`
5. `git stash list` then `git stash pop`

## 💡 Tips
- `git stash -u` also stashes untracked files
- `git stash apply` keeps the entry, `pop` removes it
";

pub(super) fn stash() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Stash, "Exercise ready: git stash", "ex10-stash")
        .write([
            FileEntry::new("README.md", STASH_README),
            FileEntry::new("form.html", STASH_FORM),
            FileEntry::new("style.css", STASH_STYLE),
        ])
        .git(GitOp::init(MAIN))
        .git(GitOp::add_all())
        .git(GitOp::commit("Initial commit: signup form"))
        .git(GitOp::checkout_new("feature-form"))
        .write([
            FileEntry::new("form.html", STASH_FORM_WIP),
            FileEntry::new("style.css", STASH_STYLE_WIP),
        ])
        .ends_on("feature-form")
        .highlight("⚡ Uncommitted changes in form.html and style.css")
        .instructions(&[
            "Check the repository state",
            "Put the work in progress aside",
            "Switch to main and back",
            "List the stash entries and restore yours",
        ])
        .build()
}

const REVERT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Shop</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <h1>Shop</h1>
    <button id="buy">Buy</button>
    <script src="bug.js"></script>
</body>
</html>
"#;

const REVERT_STYLE: &str = "button {
    background: #27ae60;
    color: white;
}
";

const REVERT_BUG: &str = "// Tracks clicks on the buy button
document.getElementById('buy').addEventListener('click', () => {
    while (true) {
        console.log('clicked');
    }
});
";

const REVERT_README: &str = "# ⏪ Exercise: undoing a published commit with git revert

## 🎯 Goal
Cancel a bad commit without rewriting the shared history.

## 📁 Initial state
Three commits:
1. `index.html`: the page
2. `style.css`: the styles
3. `bug.js`: a click tracker that freezes the browser 🐛

## 📋 Steps

1. `git log --oneline`: find the commit that added `bug.js`
2. `git revert <hash>`
3. `git log --oneline`: a new commit undoes the bad one
4. `bug.js` is gone, history is intact

## 💡 Tips
- `revert` is safe on shared branches; `reset` is not
- `git revert --no-edit` keeps the default message
";

pub(super) fn revert() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Revert, "Exercise ready: git revert", "ex11-revert")
        .write([FileEntry::new("README.md", REVERT_README)])
        .git(GitOp::init(MAIN))
        .write([FileEntry::new("index.html", REVERT_INDEX)])
        .git(GitOp::add_all())
        .git(GitOp::commit("Add shop page"))
        .commit_file(FileEntry::new("style.css", REVERT_STYLE), "Style buy button")
        .commit_file(FileEntry::new("bug.js", REVERT_BUG), "Add click tracking")
        .ends_on(MAIN)
        .highlight("🐛 The last commit (Add click tracking) introduced a bug")
        .instructions(&[
            "Show the commit history",
            "Identify the faulty commit",
            "Undo it without rewriting history",
            "Check the result in the history and the working tree",
        ])
        .build()
}

const RESET_README: &str = "# 🔙 Exercise: moving back in history with git reset

## 🎯 Goal
Understand `--soft`, `--mixed` and `--hard`.

## 📁 Initial state
Four commits: the README, then three versions of `notes.md`.

## 📋 Steps

1. `git log --oneline`
2. `git reset --soft HEAD~1`: the commit is gone, changes stay staged
3. `git commit -m \"Notes v3 again\"`
4. `git reset HEAD~1` (mixed): changes stay, but unstaged
5. `git reset --hard HEAD~1`: changes are discarded for good
6. `git reflog`: nothing is really lost

## 💡 Tips
- Never reset commits that were already pushed
- `git reflog` lists every position HEAD went through
";

fn notes(version: u32) -> String {
    let mut text = String::from("Meeting notes\n=============\n");
    for v in 1..=version {
        text.push_str(&format!("- v{}: point {} discussed\n", v, v));
    }
    text
}

pub(super) fn reset() -> Scenario {
    let mut builder =
        ScenarioBuilder::new(ScenarioId::Reset, "Exercise ready: git reset", "ex12-reset")
            .write([FileEntry::new("README.md", RESET_README)])
            .git(GitOp::init(MAIN))
            .git(GitOp::add_all())
            .git(GitOp::commit("Add README"));
    for version in 1..=3 {
        builder = builder.commit_file(
            FileEntry::new("notes.md", notes(version)),
            &format!("Notes v{}", version),
        );
    }
    builder
        .ends_on(MAIN)
        .highlight("📝 4 commits: README, then notes v1, v2, v3")
        .instructions(&[
            "Show the commit history",
            "Undo the last commit keeping the changes staged",
            "Undo it again keeping the changes unstaged",
            "Undo it discarding the changes",
            "Use the reflog to find the lost commits",
        ])
        .build()
}

const REBASE_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
    <h1>Blog</h1>
</body>
</html>
"#;

const REBASE_INDEX_NAV: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
    <nav>Home | Archive</nav>
    <h1>Blog</h1>
</body>
</html>
"#;

const REBASE_INDEX_FOOTER: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
    <nav>Home | Archive</nav>
    <h1>Blog</h1>
    <footer>Powered by coffee</footer>
</body>
</html>
"#;

const REBASE_CONTENT_1: &str = "# First post

Hello world!
";

const REBASE_CONTENT_2: &str = "# First post

Hello world!

# Second post

Rebasing keeps history linear.
";

const REBASE_README: &str = "# 📐 Exercise: replaying commits with git rebase

## 🎯 Goal
Put `feature-content` back on top of an updated `main`.

## 📁 Initial state
- `feature-content`: 2 commits on `content.md`
- `main`: 2 newer commits on `index.html` (navigation, footer)
- You are on `feature-content`

## 📋 Steps

1. `git log --oneline --all --graph`: the branches have diverged
2. `git rebase main`
3. `git log --oneline --graph`: history is now linear
4. `git switch main && git merge feature-content`: a fast-forward

## 💡 Tips
- Rebase rewrites commits: new hashes
- `git rebase --abort` if something goes wrong
";

pub(super) fn rebase() -> Scenario {
    ScenarioBuilder::new(ScenarioId::Rebase, "Exercise ready: git rebase", "ex13-rebase")
        .write([
            FileEntry::new("README.md", REBASE_README),
            FileEntry::new("index.html", REBASE_INDEX),
        ])
        .git(GitOp::init(MAIN))
        .git(GitOp::add_all())
        .git(GitOp::commit("Initial commit: blog skeleton"))
        .git(GitOp::checkout_new("feature-content"))
        .commit_file(FileEntry::new("content.md", REBASE_CONTENT_1), "Write first post")
        .commit_file(FileEntry::new("content.md", REBASE_CONTENT_2), "Write second post")
        .git(GitOp::checkout(MAIN))
        .commit_file(FileEntry::new("index.html", REBASE_INDEX_NAV), "Add navigation")
        .commit_file(FileEntry::new("index.html", REBASE_INDEX_FOOTER), "Add footer")
        .git(GitOp::checkout("feature-content"))
        .ends_on("feature-content")
        .highlight("📐 main and feature-content each have 2 commits since they diverged")
        .instructions(&[
            "Look at the diverging history",
            "Rebase feature-content onto main",
            "Check that the history is linear",
            "Fast-forward main to feature-content",
        ])
        .build()
}

const NAVBAR_STEPS: &[(&str, &str)] = &[
    ("wip", "<nav>\n    <a href=\"/\">Home</a>\n</nav>\n"),
    (
        "wip2",
        "<nav>\n    <a href=\"/\">Home</a>\n    <a href=\"/about\">Abuot</a>\n</nav>\n",
    ),
    (
        "fix typo",
        "<nav>\n    <a href=\"/\">Home</a>\n    <a href=\"/about\">About</a>\n</nav>\n",
    ),
    (
        "wip",
        "<nav class=\"navbar\">\n    <a href=\"/\">Home</a>\n    <a href=\"/about\">About</a>\n</nav>\n",
    ),
    (
        "done",
        "<nav class=\"navbar\">\n    <a href=\"/\">Home</a>\n    <a href=\"/about\">About</a>\n    <a href=\"/contact\">Contact</a>\n</nav>\n",
    ),
];

const REBASE_I_README: &str = "# 🧹 Exercise: cleaning history with git rebase -i

## 🎯 Goal
Turn five messy commits into one clean commit before sharing the branch.

## 📁 Initial state
`feature-navbar` has five commits on `navbar.html`:
`wip`, `wip2`, `fix typo`, `wip`, `done`

## 📋 Steps

1. `git log --oneline`
2. `git rebase -i main`
3. Keep `pick` on the first line, change the others to `squash` (or `s`)
4. Write a meaningful message, e.g. \"Add navigation bar\"
5. `git log --oneline`: one commit left on top of `main`

## 💡 Tips
- `fixup` squashes and drops the message
- `reword` changes a message, `drop` removes a commit
";

pub(super) fn rebase_interactive() -> Scenario {
    let mut builder = ScenarioBuilder::new(
        ScenarioId::RebaseInteractive,
        "Exercise ready: interactive rebase",
        "ex14-rebase-i",
    )
    .write([FileEntry::new("README.md", REBASE_I_README)])
    .git(GitOp::init(MAIN))
    .git(GitOp::add_all())
    .git(GitOp::commit("Initial commit"))
    .git(GitOp::checkout_new("feature-navbar"));
    for (message, navbar) in NAVBAR_STEPS {
        builder = builder.commit_file(FileEntry::new("navbar.html", *navbar), message);
    }
    builder
        .ends_on("feature-navbar")
        .highlight("🧹 feature-navbar has 5 messy commits: wip, wip2, fix typo, wip, done")
        .instructions(&[
            "Show the branch history",
            "Start an interactive rebase onto main",
            "Squash the five commits into one",
            "Give the commit a meaningful message",
        ])
        .build()
}
