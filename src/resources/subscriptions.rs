//! Subscription lifecycle actions.
//!
//! A subscription is addressed either through a website (website-level subscriptions) or
//! through a customer (customer-level subscriptions); which one applies depends on how the
//! partner is configured. Eligibility rules, such as which package counts as an upgrade, are
//! enforced by the server.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	http::{Client, RequestBody, RequestContext},
};

/// Subscription owner addressed by an action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionTarget {
	/// Website-level subscription, by the partner's website identifier.
	Website(String),
	/// Customer-level subscription, by the partner's customer identifier.
	Customer(String),
}
impl SubscriptionTarget {
	fn collection(&self) -> &'static str {
		match self {
			SubscriptionTarget::Website(_) => "website-subscriptions",
			SubscriptionTarget::Customer(_) => "intpc-subscriptions",
		}
	}

	fn id_field(&self) -> (&'static str, &str) {
		match self {
			SubscriptionTarget::Website(id) => ("intpWebsiteId", id.as_str()),
			SubscriptionTarget::Customer(id) => ("intpcId", id.as_str()),
		}
	}
}

/// Action applied to a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionAction {
	/// Moves to a larger package.
	Upgrade,
	/// Moves to a smaller package at the end of the current period.
	Downgrade,
	/// Reverts a pending cancellation or downgrade.
	Resume,
	/// Stops the subscription immediately.
	Deactivate,
	/// Stops the subscription at the end of the current period.
	Cancel,
}
impl SubscriptionAction {
	/// Path segment naming the action.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubscriptionAction::Upgrade => "upgrade",
			SubscriptionAction::Downgrade => "downgrade",
			SubscriptionAction::Resume => "resume",
			SubscriptionAction::Deactivate => "deactivate",
			SubscriptionAction::Cancel => "cancel",
		}
	}
}

/// Input for [`Client::upgrade_subscription`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeArgs {
	/// Target package.
	pub package_id: String,
	/// Starts the new package with a trial.
	pub trial: bool,
	/// Charges only the remainder of the current period.
	pub prorate: bool,
}

/// Relative path of `action` applied to `target`.
pub fn subscription_path(target: &SubscriptionTarget, action: SubscriptionAction) -> String {
	format!("/v3/3as/{}/{}", target.collection(), action.as_str())
}

fn action_body(target: &SubscriptionTarget, extra: &[(&str, Value)]) -> RequestBody {
	let (key, id) = target.id_field();
	let mut body = serde_json::Map::new();

	body.insert(key.into(), id.into());
	body.extend(extra.iter().map(|(k, v)| ((*k).to_owned(), v.clone())));

	RequestBody::Json(Value::Object(body))
}

impl Client {
	/// Upgrades a subscription to a larger package.
	pub async fn upgrade_subscription(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
		args: &UpgradeArgs,
	) -> Result<()> {
		let body = action_body(
			target,
			&[
				("packageId", Value::from(args.package_id.as_str())),
				("trial", Value::from(args.trial)),
				("proRate", Value::from(args.prorate)),
			],
		);

		self.subscription_action(ctx, target, SubscriptionAction::Upgrade, body).await
	}

	/// Schedules a downgrade to a smaller package.
	pub async fn downgrade_subscription(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
		package_id: &str,
	) -> Result<()> {
		let body = action_body(target, &[("packageId", Value::from(package_id))]);

		self.subscription_action(ctx, target, SubscriptionAction::Downgrade, body).await
	}

	/// Reverts a pending cancellation or downgrade.
	pub async fn resume_subscription(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
	) -> Result<()> {
		let body = action_body(target, &[]);

		self.subscription_action(ctx, target, SubscriptionAction::Resume, body).await
	}

	/// Deactivates a subscription immediately.
	pub async fn deactivate_subscription(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
	) -> Result<()> {
		let body = action_body(target, &[]);

		self.subscription_action(ctx, target, SubscriptionAction::Deactivate, body).await
	}

	/// Cancels a subscription at the end of the current period.
	pub async fn cancel_subscription(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
	) -> Result<()> {
		let body = action_body(target, &[]);

		self.subscription_action(ctx, target, SubscriptionAction::Cancel, body).await
	}

	async fn subscription_action(
		&self,
		ctx: &RequestContext,
		target: &SubscriptionTarget,
		action: SubscriptionAction,
		body: RequestBody,
	) -> Result<()> {
		let path = subscription_path(target, action);

		self.send::<Value>(ctx, Method::POST, &path, body).await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn paths_follow_target_and_action() {
		let website = SubscriptionTarget::Website("w1".into());
		let customer = SubscriptionTarget::Customer("c1".into());

		assert_eq!(
			subscription_path(&website, SubscriptionAction::Upgrade),
			"/v3/3as/website-subscriptions/upgrade"
		);
		assert_eq!(
			subscription_path(&customer, SubscriptionAction::Deactivate),
			"/v3/3as/intpc-subscriptions/deactivate"
		);
	}

	#[test]
	fn bodies_key_the_id_by_target() {
		let body = action_body(
			&SubscriptionTarget::Website("w1".into()),
			&[
				("packageId", Value::from("p2")),
				("trial", Value::from(true)),
				("proRate", Value::from(false)),
			],
		);

		assert_eq!(
			body,
			RequestBody::Json(serde_json::json!({
				"intpWebsiteId": "w1",
				"packageId": "p2",
				"trial": true,
				"proRate": false
			}))
		);
		assert_eq!(
			action_body(&SubscriptionTarget::Customer("c1".into()), &[]),
			RequestBody::Json(serde_json::json!({ "intpcId": "c1" }))
		);
	}
}
