use crate::entity::{Comment, Post, PostId, UserId};

/// Something owned by an author and reachable through a post's detail page.
pub trait Authored {
    fn author_id(&self) -> UserId;

    /// The post whose detail page shows this object.
    fn detail_post_id(&self) -> PostId;
}

impl Authored for Post {
    fn author_id(&self) -> UserId {
        self.author.id
    }

    fn detail_post_id(&self) -> PostId {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author.id
    }

    fn detail_post_id(&self) -> PostId {
        self.post_id
    }
}

/// Whether `actor` may edit or delete `target`. Anonymous actors never may.
pub fn can_mutate<T: Authored>(actor: Option<UserId>, target: &T) -> bool {
    actor == Some(target.author_id())
}

/// Outcome of an edit or delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationDecision {
    Allowed,
    /// Nobody is logged in; send them to the login page.
    LoginRequired,
    /// Logged in, but not the author; send them back to the post they were
    /// looking at rather than answering "forbidden".
    RedirectToPost(PostId),
}

pub fn authorize_mutation<T: Authored>(actor: Option<UserId>, target: &T) -> MutationDecision {
    match actor {
        None => MutationDecision::LoginRequired,
        Some(_) if can_mutate(actor, target) => MutationDecision::Allowed,
        Some(_) => MutationDecision::RedirectToPost(target.detail_post_id()),
    }
}
