//! Connection requests and the follow graph.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::error::Error;
use super::ids::{CompanyId, ConnectionId, UserId};
use super::networking::{Connection, ConnectionStatus, Follow, FollowStats, FollowTarget};
use super::pagination::{Page, PageOf};
use super::ports::{
    CompanyRepository, ConnectionRepository, FollowRepository, UserRepository,
};

pub struct NetworkingService {
    connections: Arc<dyn ConnectionRepository>,
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
    companies: Arc<dyn CompanyRepository>,
}

impl NetworkingService {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        follows: Arc<dyn FollowRepository>,
        users: Arc<dyn UserRepository>,
        companies: Arc<dyn CompanyRepository>,
    ) -> Self {
        Self {
            connections,
            follows,
            users,
            companies,
        }
    }

    /// Send a pending connection request.
    ///
    /// Any existing edge between the pair, in either direction, blocks a new
    /// request: a blocked edge is rejected outright, anything else is a
    /// conflict. The unique constraint backstops the check-then-insert race.
    pub async fn send_connection_request(
        &self,
        requester: UserId,
        recipient: UserId,
    ) -> Result<Connection, Error> {
        if requester == recipient {
            return Err(Error::invalid_request("you cannot connect with yourself"));
        }
        if self.users.find_by_id(recipient).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        if let Some(existing) = self.connections.find_between(requester, recipient).await? {
            return match existing.status {
                ConnectionStatus::Blocked => {
                    Err(Error::invalid_request("a connection is not possible"))
                }
                _ => Err(Error::conflict("a connection already exists for this pair")),
            };
        }

        let connection = Connection::new_request(requester, recipient);
        self.connections.insert(&connection).await?;
        info!(connection_id = %connection.id, "sent connection request");
        Ok(connection)
    }

    /// Accept or decline a pending request. Only the recipient may respond;
    /// anyone else sees the request as missing.
    pub async fn respond_to_connection(
        &self,
        recipient: UserId,
        id: ConnectionId,
        accept: bool,
    ) -> Result<Connection, Error> {
        let mut connection = self
            .connections
            .find_by_id(id)
            .await?
            .filter(|c| c.recipient_id == recipient)
            .ok_or_else(|| Error::not_found("connection request not found"))?;
        if connection.status != ConnectionStatus::Pending {
            return Err(Error::invalid_request(
                "this connection request was already answered",
            ));
        }

        let status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Declined
        };
        let responded_at = Utc::now();
        self.connections
            .update_status(id, status, responded_at)
            .await?;
        connection.status = status;
        connection.responded_at = Some(responded_at);
        Ok(connection)
    }

    /// Remove an edge; either endpoint may do so.
    pub async fn remove_connection(&self, actor: UserId, id: ConnectionId) -> Result<(), Error> {
        let connection = self
            .connections
            .find_by_id(id)
            .await?
            .filter(|c| c.involves(actor))
            .ok_or_else(|| Error::not_found("connection not found"))?;
        self.connections.delete(connection.id).await?;
        Ok(())
    }

    pub async fn list_connections(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<Connection>, Error> {
        let items = self
            .connections
            .list_accepted(user, page.offset(), page.limit())
            .await?;
        let total = self.connections.count_accepted(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn list_pending(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<Connection>, Error> {
        let items = self
            .connections
            .list_incoming_pending(user, page.offset(), page.limit())
            .await?;
        let total = self.connections.count_incoming_pending(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn list_sent(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<Connection>, Error> {
        let items = self
            .connections
            .list_outgoing_pending(user, page.offset(), page.limit())
            .await?;
        let total = self.connections.count_outgoing_pending(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Whether an accepted edge exists between the pair, either direction.
    pub async fn is_connected(&self, a: UserId, b: UserId) -> Result<bool, Error> {
        Ok(self
            .connections
            .find_between(a, b)
            .await?
            .is_some_and(|c| c.status == ConnectionStatus::Accepted))
    }

    pub async fn follow_user(&self, follower: UserId, target: UserId) -> Result<Follow, Error> {
        if follower == target {
            return Err(Error::invalid_request("you cannot follow yourself"));
        }
        if self.users.find_by_id(target).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        self.follow(follower, FollowTarget::User(target)).await
    }

    pub async fn unfollow_user(&self, follower: UserId, target: UserId) -> Result<(), Error> {
        self.unfollow(follower, FollowTarget::User(target)).await
    }

    pub async fn follow_company(
        &self,
        follower: UserId,
        target: CompanyId,
    ) -> Result<Follow, Error> {
        if self.companies.find_by_id(target).await?.is_none() {
            return Err(Error::not_found("company not found"));
        }
        self.follow(follower, FollowTarget::Company(target)).await
    }

    pub async fn unfollow_company(
        &self,
        follower: UserId,
        target: CompanyId,
    ) -> Result<(), Error> {
        self.unfollow(follower, FollowTarget::Company(target)).await
    }

    pub async fn list_followers(
        &self,
        target: FollowTarget,
        page: Page,
    ) -> Result<PageOf<Follow>, Error> {
        let items = self
            .follows
            .list_followers(target, page.offset(), page.limit())
            .await?;
        let total = self.follows.count_followers(target).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn list_following(
        &self,
        follower: UserId,
        page: Page,
    ) -> Result<PageOf<Follow>, Error> {
        let items = self
            .follows
            .list_following(follower, page.offset(), page.limit())
            .await?;
        let total = self.follows.count_following(follower).await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Follower, following, and accepted-connection counts; three
    /// independent queries.
    pub async fn stats(&self, user: UserId) -> Result<FollowStats, Error> {
        let followers_count = self
            .follows
            .count_followers(FollowTarget::User(user))
            .await?;
        let following_count = self.follows.count_following(user).await?;
        let connections_count = self.connections.count_accepted(user).await?;
        Ok(FollowStats {
            followers_count,
            following_count,
            connections_count,
        })
    }

    async fn follow(&self, follower: UserId, target: FollowTarget) -> Result<Follow, Error> {
        if self.follows.find(follower, target).await?.is_some() {
            return Err(Error::conflict("already following"));
        }
        let follow = Follow::new(follower, target);
        self.follows.insert(&follow).await?;
        Ok(follow)
    }

    async fn unfollow(&self, follower: UserId, target: FollowTarget) -> Result<(), Error> {
        if !self.follows.delete(follower, target).await? {
            return Err(Error::not_found("follow not found"));
        }
        Ok(())
    }
}
